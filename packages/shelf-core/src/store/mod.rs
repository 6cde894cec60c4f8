//! Store adapter contracts and their implementations.
//!
//! The reconciler and the asset registry only talk to the traits in this
//! module. Every call is fallible and no atomicity is promised across
//! calls: an enumerate followed by a persist is two separate round trips.

mod document;
mod file;
mod handle;
mod sheet;

use serde_json::{Map, Value};

use crate::assets::Asset;
use crate::error::StoreError;

pub use document::DocumentStore;
pub use handle::{HandleState, StoreHandle};
pub use sheet::{SheetStore, FIRST_DATA_ROW};

/// Untyped field map of one record.
pub type Fields = Map<String, Value>;

/// One row of the catalog sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRow {
    /// Sheet row number (header is row 1)
    pub row_index: usize,
    /// Cell values keyed by header column
    pub fields: Fields,
    /// Business key as enumerated. Writes fail if the row no longer holds it.
    pub key: Value,
}

/// Spreadsheet-like record store without indexes or uniqueness constraints.
pub trait CatalogStore: Send + Sync {
    /// Returns every record in physical order.
    fn enumerate_records(&self) -> Result<Vec<BookRow>, StoreError>;

    /// Appends a record after the last row.
    fn append_record(&self, fields: Fields) -> Result<(), StoreError>;

    /// Writes the record's fields back to its row. Fails with `StaleRow`
    /// if the row has shifted since enumeration.
    fn persist(&self, record: &BookRow) -> Result<(), StoreError>;

    /// Removes the record's row, shifting later rows up. Fails with
    /// `StaleRow` if the row has shifted since enumeration.
    fn delete_record(&self, record: &BookRow) -> Result<(), StoreError>;
}

/// Document store with a unique index on the asset business key.
pub trait AssetStore: Send + Sync {
    /// Returns all documents, newest `createdAt` first.
    fn find_all(&self) -> Result<Vec<Asset>, StoreError>;

    /// Looks up a document by `gmrVmrNo`.
    fn find_one(&self, key: &str) -> Result<Option<Asset>, StoreError>;

    /// Inserts a document, failing with `DuplicateKey` if the key is taken.
    fn insert(&self, asset: Asset) -> Result<Asset, StoreError>;

    /// Replaces the document with the same key. Returns `None` if absent.
    fn replace(&self, asset: Asset) -> Result<Option<Asset>, StoreError>;

    /// Deletes the document with `key`. Returns whether one existed.
    fn delete_one(&self, key: &str) -> Result<bool, StoreError>;
}
