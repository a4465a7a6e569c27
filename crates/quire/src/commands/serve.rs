//! Documentation server command.

use std::path::Path;

use anyhow::Result;
use quire_server::{DevServer, DevServerConfig, RenderMode};

use crate::config::load_config;

/// Options given on the command line; each overrides the config file.
#[derive(Debug, Default)]
pub struct ServeOptions {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub mode: Option<RenderMode>,
    pub open: bool,
}

/// Run the server.
pub async fn run(config_path: &Path, options: ServeOptions) -> Result<()> {
    let file_config = load_config(config_path)?;

    let mode = options.mode.unwrap_or_else(RenderMode::detect);

    let config = DevServerConfig {
        site: file_config.site_config(),
        static_dir: file_config.site.static_dir.clone(),
        port: options.port.unwrap_or(file_config.server.port),
        host: options.host.unwrap_or(file_config.server.host),
        mode,
        open: options.open,
    };

    tracing::info!("Starting server on port {}", config.port);

    DevServer::new(config).start().await?;

    Ok(())
}
