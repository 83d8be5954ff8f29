//! Field validation rules.
//!
//! Every field is checked independently and all failures are reported in one
//! pass. Within a single field the first failing rule wins, so each path
//! carries at most one message.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use faktur_core::FieldErrors;

use crate::draft::InvoiceDraft;
use crate::invoice::LineItem;

pub const MAX_CODE_LEN: usize = 32;
pub const MAX_PRODUCT_NAME_LEN: usize = 32;
pub const MAX_QTY: i128 = 1_000;
pub const MAX_PRICE: i128 = 1_000_000;

/// Invoices may not be dated before 2020-01-01.
pub const MIN_INVOICE_YEAR: i32 = 2020;

/// Format of the date text entered in the create/edit form.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// User-facing messages (Indonesian, the product's UI language).
pub mod messages {
    pub const CODE_REQUIRED: &str = "Kode faktur wajib diisi";
    pub const CODE_TOO_LONG: &str = "Kode faktur maksimal 32 karakter";
    pub const CODE_EXISTS: &str = "Kode faktur sudah ada";
    pub const DATE_REQUIRED: &str = "Tanggal faktur wajib diisi";
    pub const DATE_INVALID: &str = "Tanggal faktur tidak valid";
    pub const DATE_TOO_EARLY: &str = "Tanggal harus setelah 1 Januari 2020";
    pub const ITEMS_REQUIRED: &str = "Minimal satu item wajib diisi";
    pub const PRODUCT_NAME_REQUIRED: &str = "Nama produk wajib diisi";
    pub const PRODUCT_NAME_TOO_LONG: &str = "Nama produk maksimal 32 karakter";
    pub const QTY_NOT_POSITIVE: &str = "Kuantitas harus lebih dari 0";
    pub const QTY_TOO_LARGE: &str = "Kuantitas maksimal 1.000";
    pub const PRICE_NOT_POSITIVE: &str = "Harga harus lebih dari 0";
    pub const PRICE_TOO_LARGE: &str = "Harga maksimal 1.000.000";
    pub const DISCOUNT_NEGATIVE: &str = "Diskon tidak boleh negatif";
}

/// Field paths as reported in [`FieldErrors`].
pub mod paths {
    pub const INVOICE_CODE: &str = "invoiceCode";
    pub const INVOICE_DATE: &str = "invoiceDate";
    pub const ITEMS: &str = "items";
    pub const DISCOUNT: &str = "discount";
    pub const PRODUCT_NAME: &str = "productName";
    pub const QTY: &str = "qty";
    pub const PRICE: &str = "price";

    /// `items[i].field`
    pub fn item(index: usize, field: &str) -> String {
        format!("items[{index}].{field}")
    }
}

pub fn check_invoice_code(code: &str) -> Option<&'static str> {
    if code.is_empty() {
        Some(messages::CODE_REQUIRED)
    } else if code.chars().count() > MAX_CODE_LEN {
        Some(messages::CODE_TOO_LONG)
    } else {
        None
    }
}

pub fn check_invoice_date(date: NaiveDate) -> Option<&'static str> {
    (date.year() < MIN_INVOICE_YEAR).then_some(messages::DATE_TOO_EARLY)
}

/// Parse the form's date text and apply the date rules.
pub fn parse_invoice_date(input: &str) -> Result<NaiveDate, &'static str> {
    if input.is_empty() {
        return Err(messages::DATE_REQUIRED);
    }
    let date = NaiveDate::parse_from_str(input, DATE_INPUT_FORMAT)
        .map_err(|_| messages::DATE_INVALID)?;
    match check_invoice_date(date) {
        Some(message) => Err(message),
        None => Ok(date),
    }
}

pub fn check_product_name(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some(messages::PRODUCT_NAME_REQUIRED)
    } else if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        Some(messages::PRODUCT_NAME_TOO_LONG)
    } else {
        None
    }
}

pub fn check_qty(qty: impl Into<i128>) -> Option<&'static str> {
    let qty = qty.into();
    if qty <= 0 {
        Some(messages::QTY_NOT_POSITIVE)
    } else if qty > MAX_QTY {
        Some(messages::QTY_TOO_LARGE)
    } else {
        None
    }
}

pub fn check_price(price: impl Into<i128>) -> Option<&'static str> {
    let price = price.into();
    if price <= 0 {
        Some(messages::PRICE_NOT_POSITIVE)
    } else if price > MAX_PRICE {
        Some(messages::PRICE_TOO_LARGE)
    } else {
        None
    }
}

pub fn check_discount(discount: impl Into<i128>) -> Option<&'static str> {
    (discount.into() < 0).then_some(messages::DISCOUNT_NEGATIVE)
}

/// Validate a draft from the create/edit form.
pub fn validate_draft(draft: &InvoiceDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    record(&mut errors, paths::INVOICE_CODE, check_invoice_code(draft.invoice_code()));
    if let Err(message) = parse_invoice_date(draft.invoice_date()) {
        errors.insert(paths::INVOICE_DATE, message);
    }

    if draft.items().is_empty() {
        errors.insert(paths::ITEMS, messages::ITEMS_REQUIRED);
    }
    for (index, item) in draft.items().iter().enumerate() {
        check_item(&mut errors, index, &item.product_name, item.qty, item.price);
    }

    record(&mut errors, paths::DISCOUNT, check_discount(draft.discount()));
    errors
}

/// Validate already-typed invoice parts (used by [`crate::Invoice::new`]).
pub fn validate_invoice(
    code: &str,
    invoice_date: DateTime<Utc>,
    items: &[LineItem],
    discount: u64,
) -> FieldErrors {
    let mut errors = FieldErrors::new();

    record(&mut errors, paths::INVOICE_CODE, check_invoice_code(code));
    record(&mut errors, paths::INVOICE_DATE, check_invoice_date(invoice_date.date_naive()));

    if items.is_empty() {
        errors.insert(paths::ITEMS, messages::ITEMS_REQUIRED);
    }
    for (index, item) in items.iter().enumerate() {
        check_item(&mut errors, index, &item.product_name, item.qty, item.price);
    }

    record(&mut errors, paths::DISCOUNT, check_discount(discount));
    errors
}

fn check_item(
    errors: &mut FieldErrors,
    index: usize,
    product_name: &str,
    qty: impl Into<i128>,
    price: impl Into<i128>,
) {
    if let Some(message) = check_product_name(product_name) {
        errors.insert(paths::item(index, paths::PRODUCT_NAME), message);
    }
    if let Some(message) = check_qty(qty) {
        errors.insert(paths::item(index, paths::QTY), message);
    }
    if let Some(message) = check_price(price) {
        errors.insert(paths::item(index, paths::PRICE), message);
    }
}

fn record(errors: &mut FieldErrors, path: &str, message: Option<&'static str>) {
    if let Some(message) = message {
        errors.insert(path, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DraftItem;

    fn valid_draft() -> InvoiceDraft {
        let mut draft = InvoiceDraft::new();
        draft.set_invoice_code("INV-1").unwrap();
        draft.set_invoice_date("2023-11-14");
        draft.set_product_name(0, "Widget").unwrap();
        draft.set_qty(0, 2).unwrap();
        draft.set_price(0, 100).unwrap();
        draft
    }

    #[test]
    fn valid_draft_has_no_errors() {
        assert!(validate_draft(&valid_draft()).is_empty());
    }

    #[test]
    fn all_violations_surface_in_one_pass() {
        let mut draft = valid_draft();
        draft.set_invoice_code("").unwrap();
        draft.set_qty(0, 0).unwrap();
        draft.set_discount(-5);

        let errors = validate_draft(&draft);

        assert!(errors.len() >= 3);
        assert_eq!(errors.get("invoiceCode"), Some(messages::CODE_REQUIRED));
        assert_eq!(errors.get("items[0].qty"), Some(messages::QTY_NOT_POSITIVE));
        assert_eq!(errors.get("discount"), Some(messages::DISCOUNT_NEGATIVE));
    }

    #[test]
    fn quantity_and_price_bounds_are_inclusive() {
        let mut draft = valid_draft();
        draft.set_qty(0, 1000).unwrap();
        draft.set_price(0, 1_000_000).unwrap();
        assert!(validate_draft(&draft).is_empty());

        draft.set_qty(0, 1001).unwrap();
        draft.set_price(0, 1_000_001).unwrap();
        let errors = validate_draft(&draft);
        assert_eq!(errors.get("items[0].qty"), Some(messages::QTY_TOO_LARGE));
        assert_eq!(errors.get("items[0].price"), Some(messages::PRICE_TOO_LARGE));
    }

    #[test]
    fn each_item_is_checked_under_its_own_index() {
        let mut draft = valid_draft();
        draft.push_item(DraftItem {
            product_name: "x".repeat(33),
            qty: 1,
            price: 0,
        });

        let errors = validate_draft(&draft);

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get("items[1].productName"),
            Some(messages::PRODUCT_NAME_TOO_LONG)
        );
        assert_eq!(errors.get("items[1].price"), Some(messages::PRICE_NOT_POSITIVE));
    }

    #[test]
    fn code_length_is_counted_in_characters() {
        assert_eq!(check_invoice_code(&"é".repeat(32)), None);
        assert_eq!(check_invoice_code(&"a".repeat(33)), Some(messages::CODE_TOO_LONG));
    }

    #[test]
    fn date_rules() {
        assert_eq!(parse_invoice_date(""), Err(messages::DATE_REQUIRED));
        assert_eq!(parse_invoice_date("14/11/2023"), Err(messages::DATE_INVALID));
        assert_eq!(parse_invoice_date("2019-12-31"), Err(messages::DATE_TOO_EARLY));
        assert_eq!(
            parse_invoice_date("2020-01-01"),
            Ok(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
        );
    }

    #[test]
    fn empty_item_list_is_reported_on_items() {
        let errors = validate_invoice("INV-1", Utc::now(), &[], 0);
        assert_eq!(errors.get("items"), Some(messages::ITEMS_REQUIRED));
    }
}
