//! End-to-end invoice workflows over the on-disk redb backend.

use faktur_app::{InvoiceService, Route, SubmitError};
use faktur_infra::{InvoiceStore, KeyValueStorage, RedbStorage, SaveMode, StoreConfig};
use faktur_invoicing::validation::messages;
use faktur_invoicing::InvoiceDraft;

fn open(config: &StoreConfig) -> InvoiceService<RedbStorage> {
    InvoiceService::new(config.open_store().expect("open store"))
}

fn temp_config(dir: &tempfile::TempDir) -> StoreConfig {
    StoreConfig {
        db_path: dir.path().join("faktur.redb"),
        storage_key: "sales".to_string(),
    }
}

fn widget_draft(code: &str) -> InvoiceDraft {
    let mut draft = InvoiceDraft::new();
    draft.set_invoice_code(code).unwrap();
    // 1700000000000 ms falls on 2023-11-14 (UTC).
    draft.set_invoice_date("2023-11-14");
    draft.set_product_name(0, "Widget").unwrap();
    draft.set_qty(0, 2).unwrap();
    draft.set_price(0, 100).unwrap();
    draft.set_discount(50);
    draft
}

#[test]
fn create_duplicate_edit_delete_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(&dir);
    let mut service = open(&config);

    // Create INV-1: 2 x 100 - 50 = 150.
    assert_eq!(
        service.submit(&widget_draft("INV-1"), SaveMode::Create).unwrap(),
        Route::List
    );
    assert_eq!(service.detail("INV-1").unwrap().grand_total(), 150);

    // A second INV-1 is rejected on the code field; still one entry.
    let err = service
        .submit(&widget_draft("INV-1"), SaveMode::Create)
        .unwrap_err();
    assert!(matches!(&err, SubmitError::Invalid(errors)
        if errors.get("invoiceCode") == Some(messages::CODE_EXISTS)));
    assert_eq!(service.list().len(), 1);

    // Add Gadget x1 @ 30: 2*100 + 1*30 - 50 = 180.
    let mut draft = service.begin_edit("INV-1").unwrap();
    draft.add_item();
    draft.set_product_name(1, "Gadget").unwrap();
    draft.set_price(1, 30).unwrap();
    assert_eq!(
        service.submit(&draft, SaveMode::Update).unwrap(),
        Route::Detail("INV-1".to_string())
    );

    // A fresh process sees the edit.
    drop(service);
    let mut service = open(&config);
    let invoice = service.detail("INV-1").unwrap();
    assert_eq!(invoice.items().len(), 2);
    assert_eq!(invoice.grand_total(), 180);

    // Declined prompt keeps it; confirmed prompt removes exactly one.
    assert!(!service.delete("INV-1", &|_: &str| false).unwrap());
    assert!(!service.delete("INV-404", &|_: &str| true).unwrap());
    assert_eq!(service.list().len(), 1);
    assert!(service.delete("INV-1", &|_: &str| true).unwrap());
    assert!(service.list().is_empty());
}

#[test]
fn persisted_slot_matches_documented_shape() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(&dir);
    let mut service = open(&config);
    service
        .submit(&widget_draft("INV-1"), SaveMode::Create)
        .unwrap();

    let raw = service.store().storage().get("sales").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();

    assert_eq!(
        json,
        serde_json::json!([{
            "invoiceCode": "INV-1",
            "invoiceDate": 1_699_920_000_000i64,
            "items": [{ "productName": "Widget", "qty": 2, "price": 100 }],
            "discount": 50,
            "grandTotal": 150
        }])
    );
}

#[test]
fn corrupt_slot_shows_empty_listing_and_is_replaced_on_save() {
    let storage = RedbStorage::in_memory().unwrap();
    storage.set("sales", b"{not json").unwrap();

    let mut service = InvoiceService::new(InvoiceStore::open(storage));
    assert!(service.list().is_empty());

    service
        .submit(&widget_draft("INV-1"), SaveMode::Create)
        .unwrap();
    assert_eq!(service.list().len(), 1);
}

#[test]
fn exhaustive_validation_blocks_save() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = open(&temp_config(&dir));

    let mut draft = widget_draft("");
    draft.set_qty(0, 0).unwrap();
    draft.set_discount(-5);

    let err = service.submit(&draft, SaveMode::Create).unwrap_err();

    let errors = err.field_errors().unwrap();
    assert!(errors.len() >= 3);
    assert!(errors.contains("invoiceCode"));
    assert!(errors.contains("items[0].qty"));
    assert!(errors.contains("discount"));
    assert!(service.list().is_empty());
}
