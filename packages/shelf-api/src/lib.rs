//! REST gateway for the shelf facade.
//!
//! Provides HTTP endpoints for the book catalog and the asset
//! registry, CORS handling, and request routing.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
