use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use faktur_core::{DomainError, DomainResult, Entity, FieldErrors, ValueObject};

use crate::totals::{self, LineAmount};
use crate::validation;

/// One product entry within an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_name: String,
    pub qty: u32,
    /// Unit price in whole currency units.
    pub price: u64,
}

impl LineItem {
    pub fn new(product_name: impl Into<String>, qty: u32, price: u64) -> Self {
        Self {
            product_name: product_name.into(),
            qty,
            price,
        }
    }

    pub fn subtotal(&self) -> u64 {
        totals::clamp_amount(totals::line_subtotal(self))
    }
}

impl ValueObject for LineItem {}

impl LineAmount for LineItem {
    fn quantity(&self) -> i128 {
        self.qty.into()
    }

    fn unit_price(&self) -> i128 {
        self.price.into()
    }
}

/// A saved sales invoice.
///
/// Fields are private so the grand total can only come from the items and
/// discount. The serialized shape is the persisted slot format: camelCase
/// keys and the date as epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    invoice_code: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    invoice_date: DateTime<Utc>,
    items: Vec<LineItem>,
    discount: u64,
    grand_total: u64,
}

impl Invoice {
    /// Build a validated invoice. Fails with `DomainError::Validation` when any
    /// field rule is broken (including an empty item list).
    ///
    /// The date is truncated to whole milliseconds, the precision it is
    /// persisted with.
    pub fn new(
        invoice_code: impl Into<String>,
        invoice_date: DateTime<Utc>,
        items: Vec<LineItem>,
        discount: u64,
    ) -> DomainResult<Self> {
        let invoice_code = invoice_code.into();
        let invoice_date = invoice_date.trunc_subsecs(3);
        let errors = validation::validate_invoice(&invoice_code, invoice_date, &items, discount);
        if !errors.is_empty() {
            return Err(DomainError::validation(errors));
        }

        let grand_total = totals::grand_total(&items, discount);
        Ok(Self {
            invoice_code,
            invoice_date,
            items,
            discount,
            grand_total,
        })
    }

    pub fn invoice_code(&self) -> &str {
        &self.invoice_code
    }

    pub fn invoice_date(&self) -> DateTime<Utc> {
        self.invoice_date
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn discount(&self) -> u64 {
        self.discount
    }

    pub fn grand_total(&self) -> u64 {
        self.grand_total
    }

    /// Sum of line subtotals before the discount.
    pub fn items_total(&self) -> u64 {
        totals::clamp_amount(totals::items_total(&self.items))
    }

    /// Field rule violations of this invoice. Always empty for values built
    /// with [`Invoice::new`]; records read back from storage are checked with
    /// this before use.
    pub fn field_errors(&self) -> FieldErrors {
        validation::validate_invoice(&self.invoice_code, self.invoice_date, &self.items, self.discount)
    }

    /// Recompute the grand total from items and discount.
    ///
    /// Records read back from storage bypass [`Invoice::new`]; returns the
    /// stale stored value when it had to be corrected.
    pub fn reconcile(&mut self) -> Option<u64> {
        let computed = totals::grand_total(&self.items, self.discount);
        if computed == self.grand_total {
            return None;
        }
        Some(core::mem::replace(&mut self.grand_total, computed))
    }
}

impl Entity for Invoice {
    type Id = str;

    fn id(&self) -> &Self::Id {
        &self.invoice_code
    }
}
