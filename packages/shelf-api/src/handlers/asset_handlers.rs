//! Asset registry handlers.

use std::fmt::Display;

use hyper::body::{Body, Bytes};
use hyper::{Request, Response};

use crate::router::{AppState, RouterError};

use super::request_utils::{
    json_response, parse_json_body, path_param, read_request_body_with_timeout, run_blocking,
    MatchitParams,
};
use super::response::{message_response, AssetListResponse};

/// Lists every asset, newest first.
///
/// # Endpoint
/// `GET /api/assets`
///
/// # Response
/// - **200 OK**
/// ```json
/// {
///   "assets": [
///     {"gmrVmrNo": "G-1", "caseNo": "C-9", "createdAt": "...", "updatedAt": "..."}
///   ]
/// }
/// ```
pub async fn list_assets<B>(
    _req: Request<B>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
{
    let registry = state.assets.clone();
    let assets = run_blocking(move || registry.list()).await?;

    json_response(200, &AssetListResponse { assets })
}

/// Registers an asset.
///
/// # Endpoint
/// `POST /api/assets`
///
/// # Request Body
/// ```json
/// {"gmrVmrNo": "G-1", "caseNo": "C-9", "description": "Seized phone"}
/// ```
///
/// # Response
/// - **201 Created**: The stored asset with its timestamps
///
/// # Errors
/// - **400 Bad Request**: Missing `gmrVmrNo` or `caseNo`, nested field values,
///   or an existing asset with the same `gmrVmrNo`
/// - **500 Internal Server Error**: Asset store unavailable or failed
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:5000/api/assets \
///   -H "Content-Type: application/json" \
///   -d '{"gmrVmrNo": "G-1", "caseNo": "C-9"}'
/// ```
pub async fn create_asset<B>(
    req: Request<B>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: Display,
{
    let body_bytes =
        read_request_body_with_timeout(req.into_body(), state.config.request_timeout_ms).await?;
    let payload = parse_json_body(&body_bytes)?;

    let registry = state.assets.clone();
    let asset = run_blocking(move || registry.create(&payload)).await?;

    json_response(201, &asset)
}

/// Returns the asset with the given `gmrVmrNo`.
///
/// # Endpoint
/// `GET /api/assets/{id}`
///
/// # Errors
/// - **404 Not Found**: Unknown `gmrVmrNo`
pub async fn get_asset<B>(
    _req: Request<B>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
{
    let id = path_param(&params, "id")?;

    let registry = state.assets.clone();
    let asset = run_blocking(move || registry.get(&id)).await?;

    json_response(200, &asset)
}

/// Merges fields into an existing asset.
///
/// # Endpoint
/// `PUT /api/assets/{id}`
///
/// # Response
/// - **200 OK**: The updated asset
///
/// # Errors
/// - **400 Bad Request**: Attempt to change `gmrVmrNo`, empty `caseNo`, or nested values
/// - **404 Not Found**: Unknown `gmrVmrNo`
pub async fn update_asset<B>(
    req: Request<B>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: Display,
{
    let id = path_param(&params, "id")?;
    let body_bytes =
        read_request_body_with_timeout(req.into_body(), state.config.request_timeout_ms).await?;
    let payload = parse_json_body(&body_bytes)?;

    let registry = state.assets.clone();
    let asset = run_blocking(move || registry.update(&id, &payload)).await?;

    json_response(200, &asset)
}

/// Removes an asset.
///
/// # Endpoint
/// `DELETE /api/assets/{id}`
///
/// # Errors
/// - **404 Not Found**: Unknown `gmrVmrNo`
pub async fn delete_asset<B>(
    _req: Request<B>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
{
    let id = path_param(&params, "id")?;

    let registry = state.assets.clone();
    run_blocking(move || registry.delete(&id)).await?;

    json_response(200, &message_response("Asset deleted successfully"))
}
