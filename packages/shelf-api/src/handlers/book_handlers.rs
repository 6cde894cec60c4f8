//! Book catalog handlers.

use std::fmt::Display;

use hyper::body::{Body, Bytes};
use hyper::{Request, Response};

use crate::router::{AppState, RouterError};
use shelf_core::reconciler::BookFilter;

use super::request_utils::{
    json_response, parse_json_body, parse_query_params, path_param,
    read_request_body_with_timeout, run_blocking, MatchitParams,
};
use super::response::{message_response, CreateBookResponse};

/// Lists book records.
///
/// # Endpoint
/// `GET /api/books`
///
/// # Query Parameters
/// - `class`: Exact class match, case-insensitive. `All` or empty disables it.
/// - `search`: Case-insensitive substring matched against every field value.
///
/// # Response
/// - **200 OK**: Array of records in sheet order, each with its `rowIndex`
/// ```json
/// [
///   {"SrNo": 15, "Class": "I", "Book Name": "Balbharati", "Book Price": 120, "rowIndex": 2}
/// ]
/// ```
///
/// # Errors
/// - **500 Internal Server Error**: Catalog store unavailable or failed
///
/// # Example
/// ```bash
/// curl "http://localhost:5000/api/books?class=I&search=bal"
/// ```
pub async fn list_books<B>(
    req: Request<B>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
{
    let query = parse_query_params(req.uri().query());
    let filter = BookFilter::new(
        query.get("class").map(String::as_str),
        query.get("search").map(String::as_str),
    );

    let catalog = state.catalog.clone();
    let books = run_blocking(move || catalog.list(&filter)).await?;

    json_response(200, &books)
}

/// Adds a book record.
///
/// # Endpoint
/// `POST /api/books`
///
/// # Request Body
/// ```json
/// {"SrNo": "15", "Class": "I", "Book Name": "Balbharati", "Book Price": "120"}
/// ```
///
/// # Response
/// - **201 Created**
/// ```json
/// {"message": "Book added successfully", "srNo": 15}
/// ```
///
/// # Errors
/// - **400 Bad Request**: Missing `Class`, `Book Name` or `Book Price`, or invalid JSON
/// - **500 Internal Server Error**: Catalog store unavailable or failed
///
/// # Notes
/// - Numeric columns are coerced; unparseable values become `0`
/// - A missing or zero `SrNo` is replaced by a generated key
pub async fn create_book<B>(
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

    let catalog = state.catalog.clone();
    let sr_no = run_blocking(move || catalog.create(&payload)).await?;

    json_response(
        201,
        &CreateBookResponse {
            message: "Book added successfully".to_string(),
            sr_no,
        },
    )
}

/// Returns a single book record.
///
/// # Endpoint
/// `GET /api/books/{srNo}`
///
/// # Errors
/// - **404 Not Found**: No record carries `srNo`
/// - **500 Internal Server Error**: Catalog store unavailable or failed
pub async fn get_book<B>(
    _req: Request<B>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
{
    let sr_no = path_param(&params, "srNo")?;

    let catalog = state.catalog.clone();
    let book = run_blocking(move || catalog.get(&sr_no)).await?;

    json_response(200, &book)
}

/// Updates a book record in place.
///
/// # Endpoint
/// `PUT /api/books/{srNo}`
///
/// # Request Body
/// Any subset of columns. `Class`, `Book Name` and `Book Price` must be present.
/// ```json
/// {"Class": "II", "Book Name": "Balbharati", "Book Price": ""}
/// ```
///
/// # Response
/// - **200 OK**
/// ```json
/// {"message": "Book updated successfully"}
/// ```
///
/// # Errors
/// - **400 Bad Request**: Required field absent or null, or invalid JSON
/// - **404 Not Found**: No record carries `srNo`
/// - **500 Internal Server Error**: Catalog store unavailable or failed
///
/// # Example
/// ```bash
/// curl -X PUT http://localhost:5000/api/books/15 \
///   -H "Content-Type: application/json" \
///   -d '{"Class": "II", "Book Name": "Balbharati", "Book Price": 130}'
/// ```
pub async fn update_book<B>(
    req: Request<B>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: Display,
{
    let sr_no = path_param(&params, "srNo")?;
    let body_bytes =
        read_request_body_with_timeout(req.into_body(), state.config.request_timeout_ms).await?;
    let payload = parse_json_body(&body_bytes)?;

    let catalog = state.catalog.clone();
    run_blocking(move || catalog.update(&sr_no, &payload)).await?;

    json_response(200, &message_response("Book updated successfully"))
}

/// Deletes a book record. Later rows shift up by one.
///
/// # Endpoint
/// `DELETE /api/books/{srNo}`
///
/// # Errors
/// - **404 Not Found**: No record carries `srNo`
/// - **500 Internal Server Error**: Catalog store unavailable or failed
pub async fn delete_book<B>(
    _req: Request<B>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
{
    let sr_no = path_param(&params, "srNo")?;

    let catalog = state.catalog.clone();
    run_blocking(move || catalog.delete(&sr_no)).await?;

    json_response(200, &message_response("Book deleted successfully"))
}
