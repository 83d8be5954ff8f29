use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use faktur_app::render::{NOT_FOUND, render_detail, render_field_errors, render_list};
use faktur_app::{InvoiceService, Route, SubmitError};
use faktur_infra::{KeyValueStorage, SaveMode, StoreConfig};
use faktur_invoicing::{DraftItem, InvoiceDraft};
use faktur_observability::LogFormat;

#[derive(Parser)]
#[command(name = "faktur")]
#[command(about = "Manage sales invoices (faktur)")]
struct Cli {
    /// Database file (overrides FAKTUR_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Storage slot name (overrides FAKTUR_STORAGE_KEY)
    #[arg(long, global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all invoices
    List,
    /// Show one invoice
    Show { code: String },
    /// Create an invoice
    Create {
        #[arg(long)]
        code: String,
        /// Invoice date, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Line item as NAME:QTY:PRICE (repeatable)
        #[arg(long = "item", value_parser = parse_item, required = true)]
        items: Vec<DraftItem>,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        discount: i64,
    },
    /// Edit an existing invoice (the code cannot change)
    Edit {
        code: String,
        /// New invoice date, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// Replace all line items (repeatable, NAME:QTY:PRICE)
        #[arg(long = "item", value_parser = parse_item)]
        items: Vec<DraftItem>,
        /// Append a line item (repeatable, NAME:QTY:PRICE)
        #[arg(long = "add-item", value_parser = parse_item)]
        add_items: Vec<DraftItem>,
        /// Remove the line item at this 1-based position (repeatable)
        #[arg(long = "remove-item")]
        remove_items: Vec<usize>,
        #[arg(long, allow_hyphen_values = true)]
        discount: Option<i64>,
    },
    /// Delete an invoice
    Delete {
        code: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn parse_item(raw: &str) -> Result<DraftItem, String> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(price), Some(qty), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected NAME:QTY:PRICE, got {raw:?}"));
    };
    Ok(DraftItem {
        product_name: name.to_string(),
        qty: qty.trim().parse().map_err(|e| format!("invalid quantity {qty:?}: {e}"))?,
        price: price.trim().parse().map_err(|e| format!("invalid price {price:?}: {e}"))?,
    })
}

fn main() -> ExitCode {
    faktur_observability::init_with(LogFormat::Compact);

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "faktur failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = StoreConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(key) = cli.key {
        config.storage_key = key;
    }

    let mut service = InvoiceService::new(config.open_store()?);
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::List => {
            write!(stdout, "{}", render_list(&service.list()))?;
        }
        Command::Show { code } => match service.detail(&code) {
            Ok(invoice) => write!(stdout, "{}", render_detail(&invoice))?,
            Err(_) => {
                writeln!(stdout, "{NOT_FOUND}: {code}")?;
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Create {
            code,
            date,
            items,
            discount,
        } => {
            let mut draft = service.begin_create();
            draft.set_invoice_code(code)?;
            draft.set_invoice_date(date);
            replace_items(&mut draft, items);
            draft.set_discount(discount);
            return submit(&mut service, &mut stdout, &draft, SaveMode::Create);
        }
        Command::Edit {
            code,
            date,
            items,
            add_items,
            remove_items,
            discount,
        } => {
            let mut draft = match service.begin_edit(&code) {
                Ok(draft) => draft,
                Err(_) => {
                    writeln!(stdout, "{NOT_FOUND}: {code}")?;
                    write!(stdout, "{}", render_list(&service.list()))?;
                    return Ok(ExitCode::FAILURE);
                }
            };
            if let Some(date) = date {
                draft.set_invoice_date(date);
            }
            if !items.is_empty() {
                replace_items(&mut draft, items);
            }
            let mut positions = remove_items;
            positions.sort_unstable_by(|a, b| b.cmp(a));
            for position in positions {
                if position == 0 || !draft.remove_item(position - 1) {
                    anyhow::bail!("cannot remove item {position}");
                }
            }
            for item in add_items {
                draft.push_item(item);
            }
            if let Some(discount) = discount {
                draft.set_discount(discount);
            }
            return submit(&mut service, &mut stdout, &draft, SaveMode::Update);
        }
        Command::Delete { code, yes } => {
            let removed = if yes {
                service.delete(&code, &|_: &str| true)?
            } else {
                service.delete(&code, &prompt_stdin)?
            };
            if removed {
                writeln!(stdout, "deleted {code}")?;
            } else {
                writeln!(stdout, "nothing deleted")?;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Swap the draft's rows for `items`, keeping the one-row minimum.
fn replace_items(draft: &mut InvoiceDraft, items: Vec<DraftItem>) {
    let existing = draft.items().len();
    for item in items {
        draft.push_item(item);
    }
    for _ in 0..existing {
        draft.remove_item(0);
    }
}

fn submit<S: KeyValueStorage>(
    service: &mut InvoiceService<S>,
    out: &mut impl Write,
    draft: &InvoiceDraft,
    mode: SaveMode,
) -> anyhow::Result<ExitCode> {
    match service.submit(draft, mode) {
        Ok(next) => {
            match next {
                Route::Detail(code) => write!(out, "{}", render_detail(&service.detail(&code)?))?,
                _ => write!(out, "{}", render_list(&service.list()))?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(SubmitError::Invalid(errors)) => {
            write!(out, "{}", render_field_errors(&errors))?;
            Ok(ExitCode::FAILURE)
        }
        Err(err @ SubmitError::NotFound(_)) => {
            writeln!(out, "{NOT_FOUND}: {err}")?;
            write!(out, "{}", render_list(&service.list()))?;
            Ok(ExitCode::FAILURE)
        }
        Err(SubmitError::Store(err)) => Err(err).context("failed to save invoice"),
    }
}

fn prompt_stdin(message: &str) -> bool {
    eprint!("{message} [y/N] ");
    let _ = std::io::stderr().flush();

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_item_with_colons_in_name() {
        let item = parse_item("Cable 2:1 adapter:3:15000").unwrap();
        assert_eq!(item.product_name, "Cable 2:1 adapter");
        assert_eq!(item.qty, 3);
        assert_eq!(item.price, 15_000);
    }

    #[test]
    fn rejects_malformed_item() {
        assert!(parse_item("Widget:2").is_err());
        assert!(parse_item("Widget:two:100").is_err());
    }

    #[test]
    fn replace_items_keeps_only_new_rows() {
        let mut draft = InvoiceDraft::new();
        replace_items(
            &mut draft,
            vec![DraftItem {
                product_name: "Widget".to_string(),
                qty: 2,
                price: 100,
            }],
        );
        assert_eq!(draft.items().len(), 1);
        assert_eq!(draft.items()[0].product_name, "Widget");
        assert_eq!(draft.grand_total(), 200);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
