//! Record reconciliation core for the shelf catalog facade.
//!
//! Provides the shared book field schema, the catalog reconciler,
//! store adapter contracts with their file-backed implementations,
//! and the asset registry facade.

pub mod assets;
pub mod config;
pub mod error;
pub mod fields;
pub mod reconciler;
pub mod store;

pub use error::{ShelfError, StoreError};
