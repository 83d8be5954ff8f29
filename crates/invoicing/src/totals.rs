//! Derived totals.
//!
//! Amounts are widened to `i128` so unvalidated draft input (negative or huge
//! values) can never overflow. The grand total is floored at zero.

/// Anything that contributes `quantity * unit_price` to an invoice total.
pub trait LineAmount {
    fn quantity(&self) -> i128;
    fn unit_price(&self) -> i128;
}

/// `qty * price` for a single line.
pub fn line_subtotal<L: LineAmount + ?Sized>(item: &L) -> i128 {
    item.quantity() * item.unit_price()
}

/// Sum of all line subtotals.
pub fn items_total<L: LineAmount>(items: &[L]) -> i128 {
    items.iter().map(line_subtotal).sum()
}

/// `max(0, items_total - discount)`.
pub fn grand_total<L: LineAmount>(items: &[L], discount: impl Into<i128>) -> u64 {
    clamp_amount(items_total(items) - discount.into())
}

/// Clamp a widened amount into the non-negative `u64` range.
pub(crate) fn clamp_amount(amount: i128) -> u64 {
    u64::try_from(amount.max(0)).unwrap_or(u64::MAX)
}
