//! Editable invoice held by the create/edit flow.
//!
//! A draft accepts any input the form can produce (negative numbers, empty
//! strings, a date that does not parse) so that validation can report it.
//! Every mutation that touches items or the discount recomputes the grand
//! total before returning; there is no way to observe a stale total.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use faktur_core::{DomainError, DomainResult, FieldErrors};

use crate::invoice::{Invoice, LineItem};
use crate::totals::{self, LineAmount};
use crate::validation::{self, DATE_INPUT_FORMAT};

/// One editable item row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftItem {
    pub product_name: String,
    pub qty: i64,
    pub price: i64,
}

impl DraftItem {
    /// A freshly added row: no name, quantity 1, price 0.
    pub fn blank() -> Self {
        Self {
            product_name: String::new(),
            qty: 1,
            price: 0,
        }
    }

    pub fn subtotal(&self) -> i128 {
        totals::line_subtotal(self)
    }

    fn to_line_item(&self) -> DomainResult<LineItem> {
        let qty = u32::try_from(self.qty)
            .map_err(|_| DomainError::invariant("item quantity out of range"))?;
        let price = u64::try_from(self.price)
            .map_err(|_| DomainError::invariant("item price out of range"))?;
        Ok(LineItem::new(self.product_name.clone(), qty, price))
    }
}

impl Default for DraftItem {
    fn default() -> Self {
        Self::blank()
    }
}

impl From<&LineItem> for DraftItem {
    fn from(item: &LineItem) -> Self {
        Self {
            product_name: item.product_name.clone(),
            qty: item.qty.into(),
            price: to_draft_amount(item.price),
        }
    }
}

/// Saved prices are at most `MAX_PRICE`. Discounts have no upper bound; one
/// above `i64::MAX` saturates, which leaves the clamped grand total at 0 as
/// before.
fn to_draft_amount(amount: u64) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}

impl LineAmount for DraftItem {
    fn quantity(&self) -> i128 {
        self.qty.into()
    }

    fn unit_price(&self) -> i128 {
        self.price.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    invoice_code: String,
    invoice_date: String,
    items: Vec<DraftItem>,
    discount: i64,
    grand_total: u64,
    code_locked: bool,
}

impl InvoiceDraft {
    /// Empty create form with a single blank item.
    pub fn new() -> Self {
        Self {
            invoice_code: String::new(),
            invoice_date: String::new(),
            items: vec![DraftItem::blank()],
            discount: 0,
            grand_total: 0,
            code_locked: false,
        }
    }

    /// Edit form pre-filled from a saved invoice. The code cannot be changed.
    pub fn for_edit(invoice: &Invoice) -> Self {
        let mut draft = Self {
            invoice_code: invoice.invoice_code().to_string(),
            invoice_date: invoice
                .invoice_date()
                .date_naive()
                .format(DATE_INPUT_FORMAT)
                .to_string(),
            items: invoice.items().iter().map(DraftItem::from).collect(),
            discount: to_draft_amount(invoice.discount()),
            grand_total: 0,
            code_locked: true,
        };
        draft.recompute();
        draft
    }

    pub fn invoice_code(&self) -> &str {
        &self.invoice_code
    }

    pub fn is_code_locked(&self) -> bool {
        self.code_locked
    }

    pub fn set_invoice_code(&mut self, code: impl Into<String>) -> DomainResult<()> {
        if self.code_locked {
            return Err(DomainError::invariant("invoice code cannot be changed"));
        }
        self.invoice_code = code.into();
        Ok(())
    }

    /// Date text as entered, `YYYY-MM-DD`.
    pub fn invoice_date(&self) -> &str {
        &self.invoice_date
    }

    pub fn set_invoice_date(&mut self, date: impl Into<String>) {
        self.invoice_date = date.into();
    }

    pub fn items(&self) -> &[DraftItem] {
        &self.items
    }

    /// Append a blank item row.
    pub fn add_item(&mut self) {
        self.push_item(DraftItem::blank());
    }

    pub fn push_item(&mut self, item: DraftItem) {
        self.items.push(item);
        self.recompute();
    }

    /// Remove the row at `index`. The last remaining row is never removed;
    /// returns whether a row was removed.
    pub fn remove_item(&mut self, index: usize) -> bool {
        if self.items.len() <= 1 || index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        self.recompute();
        true
    }

    pub fn set_product_name(&mut self, index: usize, name: impl Into<String>) -> DomainResult<()> {
        self.item_mut(index)?.product_name = name.into();
        Ok(())
    }

    pub fn set_qty(&mut self, index: usize, qty: i64) -> DomainResult<()> {
        self.item_mut(index)?.qty = qty;
        self.recompute();
        Ok(())
    }

    pub fn set_price(&mut self, index: usize, price: i64) -> DomainResult<()> {
        self.item_mut(index)?.price = price;
        self.recompute();
        Ok(())
    }

    pub fn discount(&self) -> i64 {
        self.discount
    }

    pub fn set_discount(&mut self, discount: i64) {
        self.discount = discount;
        self.recompute();
    }

    /// Sum of item subtotals before the discount (may be negative while the
    /// form holds invalid input).
    pub fn items_total(&self) -> i128 {
        totals::items_total(&self.items)
    }

    pub fn grand_total(&self) -> u64 {
        self.grand_total
    }

    pub fn validate(&self) -> FieldErrors {
        validation::validate_draft(self)
    }

    /// Convert into a saveable invoice. The date becomes midnight UTC of the
    /// entered day.
    pub fn to_invoice(&self) -> DomainResult<Invoice> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(DomainError::validation(errors));
        }

        let date = validation::parse_invoice_date(&self.invoice_date).map_err(DomainError::invariant)?;
        let items = self
            .items
            .iter()
            .map(DraftItem::to_line_item)
            .collect::<DomainResult<Vec<_>>>()?;
        let discount = u64::try_from(self.discount)
            .map_err(|_| DomainError::invariant("discount out of range"))?;

        Invoice::new(
            self.invoice_code.clone(),
            date.and_time(NaiveTime::MIN).and_utc(),
            items,
            discount,
        )
    }

    fn item_mut(&mut self, index: usize) -> DomainResult<&mut DraftItem> {
        self.items
            .get_mut(index)
            .ok_or_else(|| DomainError::invariant(format!("no item at index {index}")))
    }

    fn recompute(&mut self) {
        self.grand_total = totals::grand_total(&self.items, self.discount);
    }
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn widget_draft() -> InvoiceDraft {
        let mut draft = InvoiceDraft::new();
        draft.set_invoice_code("INV-1").unwrap();
        draft.set_invoice_date("2023-11-14");
        draft.set_product_name(0, "Widget").unwrap();
        draft.set_qty(0, 2).unwrap();
        draft.set_price(0, 100).unwrap();
        draft.set_discount(50);
        draft
    }

    #[test]
    fn new_draft_has_one_blank_item() {
        let draft = InvoiceDraft::new();
        assert_eq!(draft.items(), &[DraftItem::blank()]);
        assert_eq!(draft.grand_total(), 0);
        assert!(!draft.is_code_locked());
    }

    #[test]
    fn every_mutation_recomputes_grand_total() {
        let mut draft = widget_draft();
        assert_eq!(draft.grand_total(), 150);

        draft.add_item();
        draft.set_product_name(1, "Gadget").unwrap();
        draft.set_price(1, 30).unwrap();
        assert_eq!(draft.grand_total(), 180);

        draft.set_discount(0);
        assert_eq!(draft.grand_total(), 230);

        assert!(draft.remove_item(0));
        assert_eq!(draft.grand_total(), 30);

        draft.set_discount(100);
        assert_eq!(draft.grand_total(), 0);
    }

    #[test]
    fn last_item_cannot_be_removed() {
        let mut draft = InvoiceDraft::new();
        assert!(!draft.remove_item(0));
        assert_eq!(draft.items().len(), 1);
    }

    #[test]
    fn editing_a_missing_row_is_an_error() {
        let mut draft = InvoiceDraft::new();
        assert!(draft.set_qty(3, 1).is_err());
    }

    #[test]
    fn to_invoice_uses_utc_midnight_of_entered_date() {
        let invoice = widget_draft().to_invoice().unwrap();

        assert_eq!(
            invoice.invoice_date(),
            Utc.with_ymd_and_hms(2023, 11, 14, 0, 0, 0).unwrap()
        );
        assert_eq!(invoice.grand_total(), 150);
    }

    #[test]
    fn to_invoice_reports_validation_errors() {
        let mut draft = widget_draft();
        draft.set_qty(0, 1001).unwrap();

        let err = draft.to_invoice().unwrap_err();
        assert!(err.field_errors().is_some_and(|e| e.contains("items[0].qty")));
    }

    #[test]
    fn edit_draft_locks_code_and_keeps_values() {
        let invoice = widget_draft().to_invoice().unwrap();
        let mut draft = InvoiceDraft::for_edit(&invoice);

        assert!(draft.is_code_locked());
        assert!(draft.set_invoice_code("OTHER").is_err());
        assert_eq!(draft.invoice_code(), "INV-1");
        assert_eq!(draft.invoice_date(), "2023-11-14");
        assert_eq!(draft.grand_total(), 150);
        assert_eq!(draft.to_invoice().unwrap(), invoice);
    }

    #[test]
    fn oversized_saved_discount_saturates_without_changing_total() {
        let date = chrono::Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let invoice = Invoice::new("INV-1", date, vec![LineItem::new("Widget", 2, 100)], u64::MAX).unwrap();

        let draft = InvoiceDraft::for_edit(&invoice);

        assert_eq!(draft.discount(), i64::MAX);
        assert_eq!(draft.grand_total(), 0);
        assert_eq!(invoice.grand_total(), 0);
    }
}
