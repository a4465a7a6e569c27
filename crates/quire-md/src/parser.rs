//! Markdown page parser.

use std::path::Path;

use pulldown_cmark::{html, Options, Parser};

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
use crate::include::expand_includes;

/// A parsed and rendered Markdown page.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Frontmatter, defaulted when the page has none
    pub frontmatter: Frontmatter,

    /// Rendered body HTML
    pub html: String,
}

/// Errors that can occur when parsing a page.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to parse front matter: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Parse a page: split off frontmatter, expand includes, render HTML.
///
/// Include paths resolve against `include_root`.
pub fn parse_page(source: &str, include_root: &Path) -> Result<ParsedPage, ParseError> {
    let (frontmatter, body) = extract_frontmatter(source)?;

    let expanded = expand_includes(body, include_root);

    Ok(ParsedPage {
        frontmatter: frontmatter.unwrap_or_default(),
        html: render_markdown(&expanded),
    })
}

/// Render Markdown to HTML.
pub fn render_markdown(content: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;

    let parser = Parser::new_ext(content, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}
