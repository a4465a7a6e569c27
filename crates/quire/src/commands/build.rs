//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quire_static::{Site, StaticBuilder};

use crate::config::load_config;

/// Run the build command.
pub fn run(config_path: &Path, output: Option<PathBuf>) -> Result<()> {
    tracing::info!("Building static site...");

    let file_config = load_config(config_path)?;
    let output_dir = output.unwrap_or_else(|| file_config.build.output.clone());

    let site = Site::new(file_config.site_config()).context("Failed to load templates")?;
    let result = StaticBuilder::new(site).build(output_dir)?;

    tracing::info!("Built {} pages in {}ms", result.pages, result.duration_ms);
    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
