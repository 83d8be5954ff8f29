//! Display formatting (id-ID locale). Never used for the stored representation.

use chrono::{DateTime, Utc};

/// `Rp. 1.234.567`
pub fn format_rupiah(amount: impl Into<i128>) -> String {
    format!("Rp. {}", group_thousands(amount.into()))
}

/// Short id-ID date, `d/m/yyyy`, in UTC.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

fn group_thousands(amount: i128) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
