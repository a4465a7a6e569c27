//! Loading pages from the content directory.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;
use quire_md::parse_page;

use crate::templates::{Context, TemplateEngine};

/// File extension of content pages.
pub const PAGE_EXTENSION: &str = "md";

/// Configuration for a site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Directory containing Markdown pages
    pub content_dir: PathBuf,

    /// Directory that include directives resolve against
    pub include_dir: PathBuf,

    /// Directory with `root.html` and `page.html`; built-in templates when unset
    pub template_dir: Option<PathBuf>,

    /// Title for pages whose frontmatter has none
    pub default_title: String,

    /// Site title
    pub site_title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            include_dir: PathBuf::from("include"),
            template_dir: None,
            default_title: "Documentation".to_string(),
            site_title: "Documentation".to_string(),
        }
    }
}

/// Errors that can occur when loading a page.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("no such page")]
    NoPage,

    #[error("{path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{path}: {message}")]
    Parse { path: String, message: String },

    #[error("Failed to render template: {0}")]
    Template(#[from] minijinja::Error),
}

/// A content directory paired with the templates that render it.
pub struct Site {
    config: SiteConfig,
    templates: TemplateEngine,
}

impl Site {
    /// Create a site, loading its templates.
    pub fn new(config: SiteConfig) -> Result<Self, SiteError> {
        let templates = match &config.template_dir {
            Some(dir) => {
                tracing::info!("Loading templates from {}", dir.display());
                TemplateEngine::from_dir(dir)?
            }
            None => TemplateEngine::builtin()?,
        };

        Ok(Self { config, templates })
    }

    /// Site configuration.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Render the page for a URL path such as `/learn/architecture`.
    ///
    /// A path ending in `/` names the `index` page of that directory.
    pub fn render(&self, url_path: &str) -> Result<String, SiteError> {
        let name = page_name(url_path).ok_or(SiteError::NoPage)?;
        let path = self
            .config
            .content_dir
            .join(format!("{}.{}", name, PAGE_EXTENSION));

        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(SiteError::NoPage),
            Err(e) => {
                return Err(SiteError::Read {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        self.render_source(&path, &source)
    }

    /// Render already-read page source located at `path`.
    pub(crate) fn render_source(&self, path: &Path, source: &str) -> Result<String, SiteError> {
        let page =
            parse_page(source, &self.config.include_dir).map_err(|e| SiteError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let title = if page.frontmatter.title.is_empty() {
            self.config.default_title.clone()
        } else {
            page.frontmatter.title
        };

        let context = Context {
            title,
            description: page.frontmatter.description,
            site_title: self.config.site_title.clone(),
            content: page.html,
        };

        Ok(self.templates.render_page(&context)?)
    }
}

/// Map a URL path to a page name relative to the content directory.
///
/// Each segment is percent-decoded. Returns `None` for paths that could leave
/// the content directory or that decode to something other than a plain
/// file name.
pub fn page_name(url_path: &str) -> Option<String> {
    let mut raw = url_path.trim_start_matches('/').to_string();
    if raw.is_empty() || raw.ends_with('/') {
        raw.push_str("index");
    }

    let segments = raw
        .split('/')
        .map(|segment| {
            let decoded = percent_decode_str(segment).decode_utf8().ok()?;
            let plain = !decoded.is_empty()
                && decoded != "."
                && decoded != ".."
                && !decoded.contains(['/', '\\', '\0']);
            plain.then(|| decoded.into_owned())
        })
        .collect::<Option<Vec<_>>>()?;

    let name = segments.join("/");
    Path::new(&name)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then_some(name)
}
