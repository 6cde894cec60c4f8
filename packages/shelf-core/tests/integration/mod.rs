//! Integration test suite for the reconciliation core.
//!
//! 1. Catalog reconciliation against a file-backed sheet
//! 2. Store file persistence and initialization failures
//! 3. Asset registry over a file-backed collection

pub mod asset_tests;
pub mod helpers;
pub mod reconciliation_tests;
pub mod store_tests;
