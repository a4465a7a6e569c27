//! Page handler with fallback.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use tower::{Service, ServiceExt};

use quire_static::{PageCache, Site, SiteError};

/// Environment variable whose presence selects [`RenderMode::Cached`].
pub const CACHED_MODE_ENV: &str = "GAE_APPLICATION";

/// How pages are produced for each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Render from disk on every request
    #[default]
    Live,

    /// Render everything once at startup and serve from memory
    Cached,
}

impl RenderMode {
    /// Pick the mode from the process environment.
    pub fn detect() -> Self {
        Self::from_env_value(std::env::var(CACHED_MODE_ENV).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self::Cached,
            _ => Self::Live,
        }
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "cached" => Ok(Self::Cached),
            other => Err(format!("unknown render mode '{}' (expected live or cached)", other)),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::Cached => f.write_str("cached"),
        }
    }
}

/// Where pages come from.
pub enum PageSource {
    /// Rendered per request
    Live(Site),

    /// Prebuilt at startup
    Cached(PageCache),
}

impl PageSource {
    /// Build a page source for `mode`, loading the cache if needed.
    pub fn new(site: Site, mode: RenderMode) -> Result<Self, quire_static::CacheError> {
        match mode {
            RenderMode::Live => Ok(Self::Live(site)),
            RenderMode::Cached => Ok(Self::Cached(PageCache::load(&site)?)),
        }
    }

    /// Produce the HTML for a URL path.
    pub fn render(&self, url_path: &str) -> Result<String, SiteError> {
        match self {
            Self::Live(site) => site.render(url_path),
            Self::Cached(cache) => cache
                .get(url_path)
                .map(str::to_string)
                .ok_or(SiteError::NoPage),
        }
    }
}

/// Shared handler state.
#[derive(Clone)]
struct PageState<F> {
    pages: Arc<PageSource>,
    fallback: F,
}

/// Build a router serving pages, deferring to `fallback` when no page matches.
///
/// Only `GET` and `HEAD` requests are looked up as pages.
pub fn page_router<F>(pages: Arc<PageSource>, fallback: F) -> Router
where
    F: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
    F::Response: IntoResponse,
    F::Future: Send,
{
    Router::new()
        .fallback(page_handler::<F>)
        .with_state(PageState { pages, fallback })
}

async fn page_handler<F>(State(state): State<PageState<F>>, req: Request) -> Response
where
    F: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
    F::Response: IntoResponse,
    F::Future: Send,
{
    if req.method() == Method::GET || req.method() == Method::HEAD {
        let path = req.uri().path().to_string();
        let pages = Arc::clone(&state.pages);
        let lookup = path.clone();

        // Live rendering reads and parses files.
        let rendered = tokio::task::spawn_blocking(move || pages.render(&lookup)).await;

        match rendered {
            Ok(Ok(html)) => return Html(html).into_response(),
            Ok(Err(SiteError::NoPage)) => {}
            Ok(Err(e)) => return server_error(&path, &e),
            Err(e) => return server_error(&path, &e),
        }
    }

    match state.fallback.oneshot(req).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

fn server_error(path: &str, err: &dyn std::error::Error) -> Response {
    tracing::error!("{}: {}", path, err);
    (StatusCode::INTERNAL_SERVER_ERROR, "failed to serve page").into_response()
}
