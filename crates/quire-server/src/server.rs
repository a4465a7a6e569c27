//! Documentation server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::services::ServeDir;

use quire_static::{CacheError, Site, SiteConfig, SiteError};

use crate::pages::{page_router, PageSource, RenderMode};

/// Configuration for the documentation server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Content, include and template locations
    pub site: SiteConfig,

    /// Directory served for requests that match no page
    pub static_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Page rendering mode
    pub mode: RenderMode,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            static_dir: PathBuf::from("static"),
            port: 8080,
            host: "127.0.0.1".to_string(),
            mode: RenderMode::Live,
            open: false,
        }
    }
}

impl DevServerConfig {
    /// Socket address to bind.
    pub fn addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ServerError::InvalidAddress(addr))
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    Bind(SocketAddr, String),

    #[error("Server error on {0}: {1}")]
    Serve(SocketAddr, String),

    #[error(transparent)]
    Site(#[from] SiteError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Documentation server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new documentation server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Start the server and serve until it fails.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = self.config.addr()?;

        let site = Site::new(self.config.site.clone())?;
        let pages = PageSource::new(site, self.config.mode)?;

        let app = page_router(Arc::new(pages), ServeDir::new(&self.config.static_dir));

        tracing::info!(
            "Serving {} ({} mode) at http://{}",
            self.config.site.content_dir.display(),
            self.config.mode,
            addr
        );

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Serve(addr, e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());
        assert_eq!(server.config.port, 8080);
        assert_eq!(server.config.mode, RenderMode::Live);
    }

    #[test]
    fn parses_listen_address() {
        let config = DevServerConfig {
            host: "0.0.0.0".to_string(),
            port: 9000,
            ..Default::default()
        };

        assert_eq!(config.addr().unwrap(), "0.0.0.0:9000".parse().unwrap());
    }

    #[test]
    fn rejects_bad_host() {
        let config = DevServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };

        assert!(matches!(config.addr(), Err(ServerError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn start_reports_bind_failure() {
        let temp = tempfile::tempdir().unwrap();
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();

        let config = DevServerConfig {
            site: SiteConfig {
                content_dir: temp.path().join("content"),
                ..Default::default()
            },
            port,
            ..Default::default()
        };

        let result = DevServer::new(config).start().await;

        assert!(matches!(result, Err(ServerError::Bind(addr, _)) if addr.port() == port));
    }

    #[test]
    fn serve_errors_are_distinct_from_bind_errors() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();

        let err = ServerError::Serve(addr, "connection reset".to_string());

        assert_eq!(err.to_string(), "Server error on 127.0.0.1:8080: connection reset");
    }

    #[tokio::test]
    async fn start_fails_without_content_in_cached_mode() {
        let temp = tempfile::tempdir().unwrap();
        let config = DevServerConfig {
            site: SiteConfig {
                content_dir: temp.path().join("missing"),
                ..Default::default()
            },
            mode: RenderMode::Cached,
            port: 0,
            ..Default::default()
        };

        let result = DevServer::new(config).start().await;

        assert!(matches!(result, Err(ServerError::Cache(_))));
    }
}
