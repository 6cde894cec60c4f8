//! Catalog reconciliation against a file-backed sheet.

use ntest::timeout;
use serde_json::json;
use tempfile::tempdir;

use shelf_core::reconciler::BookFilter;
use shelf_core::ShelfError;

use super::helpers::{book, file_reconciler};

/// Create, update with blank numerics, then read back.
#[timeout(2000)]
#[test]
fn test_create_update_read_scenario() {
    let temp_dir = tempdir().unwrap();
    let reconciler = file_reconciler(&temp_dir.path().join("catalog.json"), 0);

    let sr_no = reconciler
        .create(&book("I", "Balbharati", json!("120")))
        .unwrap();
    assert!(sr_no.as_u64().unwrap() >= 1);
    let key = sr_no.to_string();

    let created = reconciler.get(&key).unwrap();
    assert_eq!(created["Book Price"], json!(120));

    reconciler
        .update(
            &key,
            &json!({"Class": "I", "Book Name": "Balbharati", "Book Price": "", "Volume": "abc"}),
        )
        .unwrap();

    let books = reconciler.list(&BookFilter::default()).unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["Book Price"], json!(0));
    assert_eq!(books[0]["Volume"], json!(0));
    assert_eq!(books[0]["SrNo"], sr_no);
}

#[timeout(2000)]
#[test]
fn test_create_and_update_report_missing_fields() {
    let temp_dir = tempdir().unwrap();
    let reconciler = file_reconciler(&temp_dir.path().join("catalog.json"), 0);

    assert_eq!(
        reconciler.create(&json!({"Book Name": "Atlas"})),
        Err(ShelfError::MissingFields {
            fields: vec!["Class".to_string(), "Book Price".to_string()]
        })
    );

    reconciler
        .create(&json!({"SrNo": 4, "Class": "I", "Book Name": "Atlas", "Book Price": 50}))
        .unwrap();
    assert_eq!(
        reconciler.update("4", &json!({"Class": "I"})),
        Err(ShelfError::MissingFields {
            fields: vec!["Book Name".to_string(), "Book Price".to_string()]
        })
    );
    assert_eq!(reconciler.get("4").unwrap()["Book Name"], json!("Atlas"));
}

#[timeout(2000)]
#[test]
fn test_changes_survive_reopen() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("catalog.json");

    {
        let reconciler = file_reconciler(&path, 0);
        for sr in 1..=3 {
            reconciler
                .create(&json!({"SrNo": sr, "Class": "II", "Book Name": format!("Book {}", sr), "Book Price": 10}))
                .unwrap();
        }
        reconciler.delete("2").unwrap();
        reconciler
            .update("3", &json!({"Class": "II", "Book Name": "Renamed", "Book Price": 12, "Writer": "Ada"}))
            .unwrap();
    }

    let reconciler = file_reconciler(&path, 0);
    let books = reconciler.list(&BookFilter::default()).unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[1]["SrNo"], json!(3));
    assert_eq!(books[1]["rowIndex"], json!(3));
    assert_eq!(books[1]["Book Name"], json!("Renamed"));
    assert_eq!(books[1]["Writer"], json!("Ada"));
}

#[timeout(2000)]
#[test]
fn test_list_filters_by_class_and_search() {
    let temp_dir = tempdir().unwrap();
    let reconciler = file_reconciler(&temp_dir.path().join("catalog.json"), 0);

    reconciler.create(&book("I", "Balbharati", json!(120))).unwrap();
    reconciler.create(&book("II", "Balbharati Part 2", json!(130))).unwrap();
    reconciler.create(&book("I", "Atlas", json!(80))).unwrap();

    let class_one = reconciler.list(&BookFilter::new(Some("i"), None)).unwrap();
    assert_eq!(class_one.len(), 2);

    let search = reconciler
        .list(&BookFilter::new(Some("All"), Some("balbh")))
        .unwrap();
    assert_eq!(search.len(), 2);

    let both = reconciler
        .list(&BookFilter::new(Some("I"), Some("balbh")))
        .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0]["Book Name"], json!("Balbharati"));
}
