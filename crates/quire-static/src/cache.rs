//! Prebuilt page cache.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::site::{page_name, Site, SiteError, PAGE_EXTENSION};

/// Errors that can occur while loading the cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Page(#[from] SiteError),
}

/// Every page of a site, rendered once up front.
///
/// Keys are page names such as `/index` or `/learn/architecture`.
#[derive(Debug, Default, Clone)]
pub struct PageCache {
    pages: BTreeMap<String, String>,
}

impl PageCache {
    /// Render every Markdown file below the site's content directory.
    ///
    /// Fails on the first page that cannot be read or rendered.
    pub fn load(site: &Site) -> Result<Self, CacheError> {
        let root = &site.config().content_dir;
        let sources = discover_pages(root)?;

        let pages = sources
            .par_iter()
            .map(|(name, path)| -> Result<(String, String), SiteError> {
                let source = fs::read_to_string(path).map_err(|e| SiteError::Read {
                    path: path.display().to_string(),
                    source: e,
                })?;
                let html = site.render_source(path, &source)?;
                tracing::debug!("Rendered {}", name);
                Ok((name.clone(), html))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        tracing::info!("Cached {} pages from {}", pages.len(), root.display());

        Ok(Self { pages })
    }

    /// Look up the page for a URL path, with `/` suffix meaning `index`.
    pub fn get(&self, url_path: &str) -> Option<&str> {
        let name = page_name(url_path)?;
        self.pages.get(&format!("/{}", name)).map(String::as_str)
    }

    /// Number of cached pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the cache holds no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Iterate over `(name, html)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pages.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Find every page below `root` and derive its name.
fn discover_pages(root: &Path) -> Result<Vec<(String, PathBuf)>, walkdir::Error> {
    let mut pages = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            continue;
        }

        if path.extension().and_then(|e| e.to_str()) != Some(PAGE_EXTENSION) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        pages.push((format!("/{}", name), path.to_path_buf()));
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::SiteConfig;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn site_for(root: &Path) -> Site {
        Site::new(SiteConfig {
            content_dir: root.join("content"),
            include_dir: root.join("include"),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn loads_all_markdown_pages() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        fs::create_dir_all(content.join("learn/deep")).unwrap();
        fs::write(content.join("index.md"), "# Home\n").unwrap();
        fs::write(content.join("learn/index.md"), "# Learn\n").unwrap();
        fs::write(content.join("learn/deep/api.v2.md"), "# API\n").unwrap();
        fs::write(content.join("notes.txt"), "not a page").unwrap();

        let cache = PageCache::load(&site_for(temp.path())).unwrap();

        let names: Vec<_> = cache.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["/index", "/learn/deep/api.v2", "/learn/index"]);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn looks_up_by_url_path() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        fs::create_dir_all(content.join("learn")).unwrap();
        fs::write(content.join("index.md"), "# Home\n").unwrap();
        fs::write(content.join("learn/index.md"), "# Learn\n").unwrap();

        let cache = PageCache::load(&site_for(temp.path())).unwrap();

        assert!(cache.get("/").unwrap().contains("<h1>Home</h1>"));
        assert!(cache.get("/learn/").unwrap().contains("<h1>Learn</h1>"));
        assert!(cache.get("/learn/index").is_some());
        assert!(cache.get("/missing").is_none());
        assert!(cache.get("/../index").is_none());
    }

    #[test]
    fn fails_on_broken_page() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(content.join("index.md"), "# Home\n").unwrap();
        fs::write(content.join("bad.md"), "---\ntitle: [x\n---\n").unwrap();

        let result = PageCache::load(&site_for(temp.path()));

        assert!(matches!(result, Err(CacheError::Page(SiteError::Parse { .. }))));
    }

    #[test]
    fn fails_on_missing_content_dir() {
        let temp = tempdir().unwrap();

        let result = PageCache::load(&site_for(temp.path()));

        assert!(matches!(result, Err(CacheError::Walk(_))));
    }
}
