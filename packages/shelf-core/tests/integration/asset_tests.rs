//! Asset registry over a file-backed collection.

use std::fs;

use ntest::timeout;
use serde_json::json;
use tempfile::tempdir;

use shelf_core::store::DocumentStore;
use shelf_core::{ShelfError, StoreError};

use super::helpers::file_registry;

#[timeout(2000)]
#[test]
fn test_assets_survive_reopen() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("assets.json");

    {
        let registry = file_registry(&path);
        registry
            .create(&json!({"gmrVmrNo": "G-1", "caseNo": "C-1", "description": "Laptop"}))
            .unwrap();
        registry
            .create(&json!({"gmrVmrNo": "G-2", "caseNo": "C-2"}))
            .unwrap();
        registry.delete("G-1").unwrap();
    }

    let registry = file_registry(&path);
    let assets = registry.list().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].gmr_vmr_no, "G-2");

    // Index is rebuilt on load
    assert!(matches!(
        registry.create(&json!({"gmrVmrNo": "G-2", "caseNo": "C-9"})),
        Err(ShelfError::DuplicateKey { .. })
    ));
}

#[timeout(2000)]
#[test]
fn test_free_text_fields_round_trip_through_file() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("assets.json");

    let created = file_registry(&path)
        .create(&json!({"gmrVmrNo": "G-5", "caseNo": "C-5", "seizedFrom": "Warehouse 4"}))
        .unwrap();

    let loaded = file_registry(&path).get("G-5").unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.details["seizedFrom"], "Warehouse 4");
}

#[timeout(2000)]
#[test]
fn test_corrupt_collection_fails_to_open() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("assets.json");
    fs::write(&path, r#"{"version": 2, "checksum": 0, "documents": []}"#).unwrap();

    assert!(matches!(
        DocumentStore::open(&path),
        Err(StoreError::Corrupted(_))
    ));
    assert!(matches!(
        file_registry(&path).list(),
        Err(ShelfError::StoreInit { store: "assets", .. })
    ));
}
