//! Page loading and static output for quire sites.
//!
//! Renders Markdown pages from a content directory through HTML templates,
//! either on demand or ahead of time into an in-memory cache or a directory.

pub mod builder;
pub mod cache;
pub mod site;
pub mod templates;

pub use builder::{BuildError, BuildResult, StaticBuilder};
pub use cache::{CacheError, PageCache};
pub use site::{Site, SiteConfig, SiteError};
pub use templates::TemplateEngine;
