//! Store file persistence and initialization failures.

use std::fs;

use ntest::timeout;
use serde_json::json;
use tempfile::tempdir;

use shelf_core::fields::BOOK_SCHEMA;
use shelf_core::reconciler::BookFilter;
use shelf_core::store::{CatalogStore, HandleState, SheetStore, FIRST_DATA_ROW};
use shelf_core::{ShelfError, StoreError};

use super::helpers::{book, file_reconciler};

#[timeout(2000)]
#[test]
fn test_missing_workbook_is_created_with_header() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("data").join("catalog.json");

    let store = SheetStore::open(&path, 0, &BOOK_SCHEMA).unwrap();
    assert!(path.exists());
    assert_eq!(store.header().len(), BOOK_SCHEMA.columns.len());
    assert_eq!(store.header()[0], "SrNo");
    assert!(store.enumerate_records().unwrap().is_empty());
}

#[timeout(2000)]
#[test]
fn test_reopen_preserves_rows_in_order() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("catalog.json");

    {
        let store = SheetStore::open(&path, 0, &BOOK_SCHEMA).unwrap();
        for sr in 1..=3 {
            let fields = json!({"SrNo": sr, "Class": "I"}).as_object().cloned().unwrap();
            store.append_record(fields).unwrap();
        }
    }

    let store = SheetStore::open(&path, 0, &BOOK_SCHEMA).unwrap();
    let rows = store.enumerate_records().unwrap();
    let keys: Vec<_> = rows.iter().map(|r| r.fields["SrNo"].clone()).collect();
    assert_eq!(keys, vec![json!(1), json!(2), json!(3)]);
    assert_eq!(rows[2].row_index, FIRST_DATA_ROW + 2);
}

#[timeout(2000)]
#[test]
fn test_reopen_with_hard_float_keeps_checksum() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("catalog.json");
    let price = json!(1.0715660391465826e-75);

    {
        let reconciler = file_reconciler(&path, 0);
        reconciler
            .create(&json!({"SrNo": 4, "Class": "I", "Book Name": "Atlas", "Book Price": price}))
            .unwrap();
    }

    let store = SheetStore::open(&path, 0, &BOOK_SCHEMA).unwrap();
    let rows = store.enumerate_records().unwrap();
    assert_eq!(rows[0].fields["Book Price"], price);
}

#[timeout(2000)]
#[test]
fn test_tampered_workbook_fails_checksum() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("catalog.json");

    {
        let store = SheetStore::open(&path, 0, &BOOK_SCHEMA).unwrap();
        let fields = json!({"SrNo": 1, "Class": "I"}).as_object().cloned().unwrap();
        store.append_record(fields).unwrap();
    }

    let contents = fs::read_to_string(&path).unwrap();
    fs::write(&path, contents.replace("\"I\"", "\"X\"")).unwrap();

    assert!(matches!(
        SheetStore::open(&path, 0, &BOOK_SCHEMA),
        Err(StoreError::Corrupted(_))
    ));
}

#[timeout(2000)]
#[test]
fn test_sheet_index_out_of_range() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("catalog.json");

    assert_eq!(
        SheetStore::open(&path, 3, &BOOK_SCHEMA).unwrap_err(),
        StoreError::SheetNotFound { index: 3, count: 1 }
    );
}

#[timeout(2000)]
#[test]
fn test_initialization_failure_is_resignaled() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("catalog.json");
    fs::write(&path, "{ not json").unwrap();

    let reconciler = file_reconciler(&path, 0);
    assert_eq!(reconciler.store().state(), HandleState::Uninitialized);

    for _ in 0..2 {
        match reconciler.list(&BookFilter::default()) {
            Err(ShelfError::StoreInit { store, message }) => {
                assert_eq!(store, "catalog");
                assert!(message.contains("Failed to parse workbook"));
            }
            other => panic!("Expected StoreInit, got {:?}", other),
        }
    }

    // Fixing the file does not trigger a retry
    fs::remove_file(&path).unwrap();
    assert!(matches!(
        reconciler.create(&book("I", "Atlas", json!(1))),
        Err(ShelfError::StoreInit { .. })
    ));
    assert_eq!(reconciler.store().state(), HandleState::Failed);
}
