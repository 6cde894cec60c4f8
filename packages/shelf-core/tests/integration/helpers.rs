//! Shared fixtures.

use std::path::Path;
use std::sync::Arc;

use shelf_core::assets::AssetRegistry;
use shelf_core::fields::BOOK_SCHEMA;
use shelf_core::reconciler::CatalogReconciler;
use shelf_core::store::{AssetStore, CatalogStore, DocumentStore, SheetStore, StoreHandle};

/// Reconciler over a workbook file, opened lazily.
pub fn file_reconciler(path: &Path, sheet_index: usize) -> CatalogReconciler {
    let path = path.to_path_buf();
    CatalogReconciler::new(StoreHandle::lazy("catalog", move || {
        let store: Arc<dyn CatalogStore> =
            Arc::new(SheetStore::open(&path, sheet_index, &BOOK_SCHEMA)?);
        Ok(store)
    }))
}

/// Registry over a collection file, opened lazily.
pub fn file_registry(path: &Path) -> AssetRegistry {
    let path = path.to_path_buf();
    AssetRegistry::new(StoreHandle::lazy("assets", move || {
        let store: Arc<dyn AssetStore> = Arc::new(DocumentStore::open(&path)?);
        Ok(store)
    }))
}

/// Book payload with the required fields.
pub fn book(class: &str, name: &str, price: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "Class": class,
        "Book Name": name,
        "Book Price": price,
    })
}
