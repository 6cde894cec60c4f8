//! Facade configuration.

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;

/// Process-wide facade configuration.
#[derive(Debug, Clone)]
pub struct ShelfConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the store files
    pub data_dir: PathBuf,
    /// Workbook file name for the book catalog, relative to `data_dir`
    pub catalog_file: String,
    /// Sheet inside the workbook that holds the catalog
    pub sheet_index: usize,
    /// Collection file name for the asset registry, relative to `data_dir`
    pub asset_file: String,
    /// Value of the Access-Control-Allow-Origin header
    pub cors_origin: String,
    /// Request body read timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Keep both stores in memory only
    pub ephemeral: bool,
}

impl ShelfConfig {
    /// Full path of the catalog workbook.
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }

    /// Socket address to listen on. Accepts IPv4 and IPv6 hosts.
    pub fn listen_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Full path of the asset collection.
    pub fn asset_path(&self) -> PathBuf {
        self.data_dir.join(&self.asset_file)
    }
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            data_dir: PathBuf::from("./data"),
            catalog_file: "catalog.json".to_string(),
            sheet_index: 0,
            asset_file: "assets.json".to_string(),
            cors_origin: "*".to_string(),
            request_timeout_ms: 5000, // 5 seconds default
            ephemeral: false,
        }
    }
}
