//! HTTP server for quire documentation pages.
//!
//! Serves rendered Markdown pages and hands every other request to a
//! fallback service, typically a static file server.

pub mod pages;
pub mod server;

pub use pages::{page_router, PageSource, RenderMode};
pub use server::{DevServer, DevServerConfig, ServerError};
