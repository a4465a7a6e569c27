//! Static site builder.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use crate::cache::{CacheError, PageCache};
use crate::site::Site;

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Load(#[from] CacheError),

    #[error("Failed to write output: {path}: {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Writes every page of a site to disk as HTML.
pub struct StaticBuilder {
    site: Site,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(site: Site) -> Self {
        Self { site }
    }

    /// Render all pages and write `<name>.html` files below `output_dir`.
    pub fn build(&self, output_dir: impl Into<PathBuf>) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let output_dir = output_dir.into();

        let cache = PageCache::load(&self.site)?;

        for (name, html) in cache.iter() {
            let output_path = output_dir.join(format!("{}.html", name.trim_start_matches('/')));

            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent).map_err(|source| BuildError::WriteError {
                    path: parent.display().to_string(),
                    source,
                })?;
            }

            fs::write(&output_path, html).map_err(|source| BuildError::WriteError {
                path: output_path.display().to_string(),
                source,
            })?;

            tracing::debug!("Wrote {}", output_path.display());
        }

        Ok(BuildResult {
            pages: cache.len(),
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::SiteConfig;
    use tempfile::tempdir;

    #[test]
    fn builds_simple_site() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        let out = temp.path().join("dist");

        fs::create_dir_all(content.join("learn")).unwrap();
        fs::write(
            content.join("index.md"),
            r#"---
title: Home
---
# Welcome
"#,
        )
        .unwrap();
        fs::write(content.join("learn/layout.md"), "# Layout\n").unwrap();

        let site = Site::new(SiteConfig {
            content_dir: content,
            include_dir: temp.path().join("include"),
            ..Default::default()
        })
        .unwrap();

        let result = StaticBuilder::new(site).build(&out).unwrap();

        assert_eq!(result.pages, 2);
        assert_eq!(result.output_dir, out);
        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("<title>Home</title>"));
        assert!(out.join("learn/layout.html").exists());
    }

    #[test]
    fn build_fails_on_missing_content() {
        let temp = tempdir().unwrap();

        let site = Site::new(SiteConfig {
            content_dir: temp.path().join("content"),
            ..Default::default()
        })
        .unwrap();

        let result = StaticBuilder::new(site).build(temp.path().join("dist"));

        assert!(matches!(result, Err(BuildError::Load(_))));
    }
}
