//! HTTP endpoint implementations for the book catalog and asset registry.

pub mod asset_handlers;
pub mod book_handlers;
pub mod request_utils;
pub mod response;

use hyper::body::{Body, Bytes};
use hyper::{Request, Response};

use crate::router::{AppState, RouterError};

pub use asset_handlers::{create_asset, delete_asset, get_asset, list_assets, update_asset};
pub use book_handlers::{create_book, delete_book, get_book, list_books, update_book};
pub use request_utils::{map_shelf_error_to_router_error, MatchitParams};
pub use response::{error_response, missing_fields_response, ErrorResponse};

/// Liveness probe. Never touches a store.
///
/// # Endpoint
/// `GET /api/health`
///
/// # Response
/// - **200 OK**
/// ```json
/// {"status": "ok"}
/// ```
pub async fn health<B>(
    _req: Request<B>,
    _params: MatchitParams<'_, '_>,
    _state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
{
    request_utils::json_response(200, &response::HealthResponse { status: "ok" })
}
