//! Matchit routing configuration.

use std::fmt::Display;
use std::sync::Arc;

use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use matchit::Router as MatchitRouter;

use crate::handlers;
use crate::middleware::Cors;
use shelf_core::assets::AssetRegistry;
use shelf_core::config::ShelfConfig;
use shelf_core::reconciler::CatalogReconciler;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Book catalog facade
    pub catalog: Arc<CatalogReconciler>,
    /// Asset registry facade
    pub assets: Arc<AssetRegistry>,
    /// Service configuration
    pub config: Arc<ShelfConfig>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
    cors: Cors,
}

impl Router {
    /// Creates a new router with default routes.
    pub fn new(
        catalog: Arc<CatalogReconciler>,
        assets: Arc<AssetRegistry>,
        config: Arc<ShelfConfig>,
    ) -> Self {
        let mut router = MatchitRouter::new();

        router
            .insert("/api/health", RouteHandler::Health)
            .expect("Failed to insert /api/health route");

        // Book catalog endpoints
        router
            .insert("/api/books", RouteHandler::Books)
            .expect("Failed to insert /api/books route");
        router
            .insert("/api/books/{srNo}", RouteHandler::Book)
            .expect("Failed to insert /api/books/{srNo} route");

        // Asset registry endpoints
        router
            .insert("/api/assets", RouteHandler::Assets)
            .expect("Failed to insert /api/assets route");
        router
            .insert("/api/assets/{id}", RouteHandler::Asset)
            .expect("Failed to insert /api/assets/{id} route");

        let cors = Cors::new(&config.cors_origin);
        Self {
            inner: router,
            state: AppState {
                catalog,
                assets,
                config,
            },
            cors,
        }
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// # Returns
    /// `Result<Response<Bytes>, RouterError>` containing the response or an error.
    pub async fn route<B>(&self, req: Request<B>) -> Result<Response<Bytes>, RouterError>
    where
        B: Body + Send,
        B::Error: Display,
    {
        let path = req.uri().path().to_string();

        match self.inner.at(&path) {
            Ok(matched) => {
                let handler = matched.value;
                handler
                    .handle(req, matched.params, self.state.clone())
                    .await
            }
            Err(_) => Err(RouterError::NotFound(format!("No route found for {}", path))),
        }
    }

    /// Answers a request, turning errors into JSON envelopes and adding
    /// CORS headers. `OPTIONS` is answered as a preflight on any path.
    pub async fn respond<B>(&self, req: Request<B>) -> Response<Bytes>
    where
        B: Body + Send,
        B::Error: Display,
    {
        if req.method() == Method::OPTIONS {
            return self.cors.preflight();
        }

        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let mut response = match self.route(req).await {
            Ok(response) => response,
            Err(err) => {
                if err.status() >= 500 {
                    tracing::error!("{} {} failed: {}", method, path, err);
                } else {
                    tracing::debug!("{} {} rejected: {}", method, path, err);
                }
                Response::from(err)
            }
        };
        tracing::debug!("{} {} -> {}", method, path, response.status());

        self.cors.apply(&mut response);
        response
    }
}

/// Route handler function.
enum RouteHandler {
    Health,
    Books,
    Book,
    Assets,
    Asset,
}

impl RouteHandler {
    /// Handles a request with the given route parameters.
    async fn handle<B>(
        &self,
        req: Request<B>,
        params: matchit::Params<'_, '_>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError>
    where
        B: Body + Send,
        B::Error: Display,
    {
        let method = req.method().clone();
        match (self, method) {
            (RouteHandler::Health, Method::GET) => handlers::health(req, params, state).await,

            (RouteHandler::Books, Method::GET) => handlers::list_books(req, params, state).await,
            (RouteHandler::Books, Method::POST) => {
                handlers::create_book(req, params, state).await
            }
            (RouteHandler::Book, Method::GET) => handlers::get_book(req, params, state).await,
            (RouteHandler::Book, Method::PUT) => handlers::update_book(req, params, state).await,
            (RouteHandler::Book, Method::DELETE) => {
                handlers::delete_book(req, params, state).await
            }

            (RouteHandler::Assets, Method::GET) => {
                handlers::list_assets(req, params, state).await
            }
            (RouteHandler::Assets, Method::POST) => {
                handlers::create_asset(req, params, state).await
            }
            (RouteHandler::Asset, Method::GET) => handlers::get_asset(req, params, state).await,
            (RouteHandler::Asset, Method::PUT) => {
                handlers::update_asset(req, params, state).await
            }
            (RouteHandler::Asset, Method::DELETE) => {
                handlers::delete_asset(req, params, state).await
            }

            _ => Err(RouterError::MethodNotAllowed),
        }
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    BadRequest(String),
    NotFound(String),
    MissingFields(Vec<String>),
}

impl RouterError {
    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            RouterError::MethodNotAllowed => 405,
            RouterError::InternalError(_) => 500,
            RouterError::Timeout => 408,
            RouterError::BadRequest(_) | RouterError::MissingFields(_) => 400,
            RouterError::NotFound(_) => 404,
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            RouterError::MissingFields(fields) => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
        }
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        let error_response = match err {
            RouterError::MissingFields(fields) => handlers::missing_fields_response(
                status,
                format!("Missing required fields: {}", fields.join(", ")),
                fields,
            ),
            RouterError::MethodNotAllowed => {
                handlers::error_response(status, "Method Not Allowed".to_string(), None)
            }
            RouterError::Timeout => {
                handlers::error_response(status, "Request Timeout".to_string(), None)
            }
            RouterError::InternalError(msg)
            | RouterError::BadRequest(msg)
            | RouterError::NotFound(msg) => handlers::error_response(status, msg, None),
        };

        let body = serde_json::to_vec(&error_response)
            .unwrap_or_else(|e| format!("{{\"success\":false,\"error\":{{\"code\":\"500\",\"message\":\"Failed to serialize error: {}\"}}}}", e).into_bytes());

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Bytes::from(body))
            .unwrap_or_else(|_| {
                let mut fallback = Response::new(Bytes::from("Internal Server Error"));
                *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }
}
