//! REST server for the shelf facade.
//!
//! Wires the catalog reconciler and asset registry to their stores,
//! serves the HTTP API and stops on Ctrl+C.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use shelf_api::{router::Router, server::Server};
use shelf_core::assets::AssetRegistry;
use shelf_core::config::ShelfConfig;
use shelf_core::fields::BOOK_SCHEMA;
use shelf_core::reconciler::CatalogReconciler;
use shelf_core::store::{AssetStore, CatalogStore, DocumentStore, SheetStore, StoreHandle};
use tokio::signal;

/// Command-line arguments for the shelf server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "SHELF_PORT", default_value_t = 5000)]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "SHELF_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Directory holding the store files
    #[arg(long, env = "SHELF_DATA_DIR", default_value = "./data")]
    data_dir: String,

    /// Workbook file for the book catalog
    #[arg(long, env = "SHELF_CATALOG_FILE", default_value = "catalog.json")]
    catalog_file: String,

    /// Sheet inside the workbook that holds the catalog
    #[arg(long, env = "SHELF_SHEET_INDEX", default_value_t = 0)]
    sheet_index: usize,

    /// Collection file for the asset registry
    #[arg(long, env = "SHELF_ASSET_FILE", default_value = "assets.json")]
    asset_file: String,

    /// Allowed CORS origin
    #[arg(long, env = "SHELF_CORS_ORIGIN", default_value = "*")]
    cors_origin: String,

    /// Request timeout in milliseconds
    #[arg(long, env = "SHELF_REQUEST_TIMEOUT_MS", default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Keep both stores in memory only
    #[arg(long, env = "SHELF_EPHEMERAL")]
    ephemeral: bool,
}

impl From<Args> for ShelfConfig {
    fn from(args: Args) -> Self {
        ShelfConfig {
            host: args.host,
            port: args.port,
            data_dir: PathBuf::from(args.data_dir),
            catalog_file: args.catalog_file,
            sheet_index: args.sheet_index,
            asset_file: args.asset_file,
            cors_origin: args.cors_origin,
            request_timeout_ms: args.request_timeout_ms,
            ephemeral: args.ephemeral,
        }
    }
}

/// Catalog store handle. Opening is deferred to the first request so a
/// broken workbook only disables the book routes.
fn catalog_handle(config: &ShelfConfig) -> StoreHandle<dyn CatalogStore> {
    if config.ephemeral {
        let store: Arc<dyn CatalogStore> = Arc::new(SheetStore::in_memory(&BOOK_SCHEMA));
        return StoreHandle::ready("catalog", store);
    }

    let path = config.catalog_path();
    let sheet_index = config.sheet_index;
    StoreHandle::lazy("catalog", move || {
        let store: Arc<dyn CatalogStore> =
            Arc::new(SheetStore::open(&path, sheet_index, &BOOK_SCHEMA)?);
        Ok(store)
    })
}

/// Asset store handle, opened on first use.
fn asset_handle(config: &ShelfConfig) -> StoreHandle<dyn AssetStore> {
    if config.ephemeral {
        let store: Arc<dyn AssetStore> = Arc::new(DocumentStore::in_memory());
        return StoreHandle::ready("assets", store);
    }

    let path = config.asset_path();
    StoreHandle::lazy("assets", move || {
        let store: Arc<dyn AssetStore> = Arc::new(DocumentStore::open(&path)?);
        Ok(store)
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(ShelfConfig::from(args));

    let catalog = Arc::new(CatalogReconciler::new(catalog_handle(&config)));
    let assets = Arc::new(AssetRegistry::new(asset_handle(&config)));
    let router = Router::new(catalog, assets, Arc::clone(&config));

    let addr: SocketAddr = config
        .listen_addr()
        .with_context(|| format!("Invalid listen host '{}'", config.host))?;
    let server = Server::new(addr, router);

    tracing::info!("Starting shelf server");
    tracing::info!("  Host: {}", config.host);
    tracing::info!("  Port: {}", config.port);
    if config.ephemeral {
        tracing::info!("  Stores: in-memory");
    } else {
        tracing::info!(
            "  Catalog: {} (sheet {})",
            config.catalog_path().display(),
            config.sheet_index
        );
        tracing::info!("  Assets: {}", config.asset_path().display());
    }
    tracing::info!("  CORS origin: {}", config.cors_origin);
    tracing::info!("  Request timeout: {} ms", config.request_timeout_ms);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.serve().await {
            tracing::error!("Server error: {}", e);
        }
    });

    signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c")?;
    tracing::info!("Shutting down server...");
    server_handle.abort();

    Ok(())
}
