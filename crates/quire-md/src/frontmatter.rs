//! Frontmatter extraction and parsing.

use serde::Deserialize;

const DELIMITER: &str = "---";

/// Parsed frontmatter from a Markdown page.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Page title, empty when the page does not set one
    #[serde(default)]
    pub title: String,

    /// Page description for the meta tag
    #[serde(default)]
    pub description: Option<String>,
}

/// Extract frontmatter from a Markdown page.
///
/// Frontmatter is only recognised when the source starts with `---`; the YAML
/// runs up to the next `---`. Without a closing delimiter the whole source is
/// treated as the body.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let Some(after_open) = source.strip_prefix(DELIMITER) else {
        return Ok((None, source));
    };

    let Some(close_pos) = after_open.find(DELIMITER) else {
        return Ok((None, source));
    };

    let yaml_content = &after_open[..close_pos];
    let remaining = &after_open[close_pos + DELIMITER.len()..];

    if yaml_content.trim().is_empty() {
        return Ok((Some(Frontmatter::default()), remaining));
    }

    let frontmatter: Frontmatter = serde_yaml::from_str(yaml_content)
        .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;

    Ok((Some(frontmatter), remaining))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("{0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: Architecture
description: How the pieces fit together
---

# Overview
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title, "Architecture");
        assert_eq!(
            fm.description,
            Some("How the pieces fit together".to_string())
        );
        assert_eq!(content, "\n\n# Overview\n");
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn requires_delimiter_at_very_start() {
        let source = "\n---\ntitle: Late\n---\nbody";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn unclosed_block_is_plain_body() {
        let source = "---\ntitle: Test\n# No closing";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn empty_header_gives_default() {
        let (fm, content) = extract_frontmatter("------\nbody").unwrap();

        assert_eq!(fm, Some(Frontmatter::default()));
        assert_eq!(content, "\nbody");
    }

    #[test]
    fn missing_title_is_empty() {
        let (fm, _) = extract_frontmatter("---\ndescription: x\n---\n").unwrap();

        assert_eq!(fm.unwrap().title, "");
    }

    #[test]
    fn ignores_unknown_keys() {
        let (fm, _) = extract_frontmatter("---\ntitle: A\nlayout: wide\n---\n").unwrap();

        assert_eq!(fm.unwrap().title, "A");
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }
}
