//! Markdown page parsing with frontmatter and source file inclusion.
//!
//! This crate splits YAML frontmatter from a page body, splices ranges of
//! external source files into the Markdown, and renders the result to HTML.

pub mod frontmatter;
pub mod include;
pub mod parser;

pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
pub use include::{
    expand_includes, include_file, undent, Address, IncludeError, MAX_INCLUDE_DEPTH,
};
pub use parser::{parse_page, render_markdown, ParseError, ParsedPage};
