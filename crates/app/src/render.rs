//! Plain-text rendering of the listing, detail and form-error views.

use std::fmt::{self, Write as _};

use faktur_core::FieldErrors;
use faktur_invoicing::{Invoice, format_date, format_rupiah};

use crate::services::InvoiceSummary;

pub const EMPTY_LIST: &str = "Belum ada faktur. Silakan buat faktur pertama Anda!";
pub const NOT_FOUND: &str = "Faktur tidak ditemukan";

pub fn render_list(rows: &[InvoiceSummary]) -> String {
    if rows.is_empty() {
        return format!("{EMPTY_LIST}\n");
    }
    render(|out| write_list(out, rows))
}

pub fn render_detail(invoice: &Invoice) -> String {
    render(|out| write_detail(out, invoice))
}

/// Run a writer against a fresh `String`; formatting into memory cannot fail.
fn render(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    let _ = write(&mut out);
    out
}

fn write_list(out: &mut String, rows: &[InvoiceSummary]) -> fmt::Result {
    writeln!(
        out,
        "{:<32}  {:<10}  {:>11}  {:>18}",
        "No. Faktur", "Tanggal", "Jumlah Item", "Total"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<32}  {:<10}  {:>11}  {:>18}",
            row.invoice_code,
            format_date(row.invoice_date),
            row.item_count,
            format_rupiah(row.grand_total),
        )?;
    }
    Ok(())
}

fn write_detail(out: &mut String, invoice: &Invoice) -> fmt::Result {
    writeln!(out, "Kode Faktur : {}", invoice.invoice_code())?;
    writeln!(out, "Tanggal     : {}", format_date(invoice.invoice_date()))?;
    writeln!(out)?;
    writeln!(
        out,
        "{:>3}  {:<32}  {:>9}  {:>16}  {:>18}",
        "No.", "Nama Produk", "Kuantitas", "Harga", "Subtotal"
    )?;
    for (index, item) in invoice.items().iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<32}  {:>9}  {:>16}  {:>18}",
            index + 1,
            item.product_name,
            item.qty,
            format_rupiah(item.price),
            format_rupiah(item.subtotal()),
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Subtotal : {}", format_rupiah(invoice.items_total()))?;
    writeln!(out, "Diskon   : {}", format_rupiah(invoice.discount()))?;
    writeln!(out, "TOTAL    : {}", format_rupiah(invoice.grand_total()))
}

/// One `path: message` line per field error.
pub fn render_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(path, message)| format!("{path}: {message}\n"))
        .collect()
}
