//! Source file inclusion.
//!
//! A line of the form `{{path}}[/start/,/end/]` is replaced by the lines of
//! `path` between the first match of `start` and the first following match of
//! `end`. Prefixing the directive with `<` wraps the included text in a fenced
//! code block instead of splicing it into the Markdown.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Lines containing this marker are never included.
const OMIT_MARKER: &str = "OMIT";

/// How deep plain includes may nest before expansion stops.
pub const MAX_INCLUDE_DEPTH: usize = 8;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(<)?\{\{([^{}]+)\}\}(?:\[(.*)\])?\s*$").expect("directive regex is valid")
});

/// Errors that can occur when including a file.
#[derive(Debug, thiserror::Error)]
pub enum IncludeError {
    #[error("{path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("{0}: missing / separators")]
    MissingSeparators(String),

    #[error("{pattern}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{0}: path escapes the include directory")]
    OutsideRoot(String),

    #[error("{0}: includes nested deeper than {max} levels", max = MAX_INCLUDE_DEPTH)]
    TooDeep(String),
}

/// A `/start/,/end/` range selector.
#[derive(Debug, Clone)]
pub struct Address {
    start: Regex,
    end: Regex,
}

impl Address {
    /// Parse an address of the form `/start/,/end/`.
    ///
    /// The address is split on its first comma, so neither regex may be
    /// followed by one.
    pub fn parse(addr: &str) -> Result<Self, IncludeError> {
        let Some((start, end)) = addr.split_once(',') else {
            return Err(IncludeError::InvalidAddress(addr.to_string()));
        };

        Ok(Self {
            start: delimited_regex(start)?,
            end: delimited_regex(end)?,
        })
    }

    /// Select the addressed range of `text`.
    ///
    /// The range starts at the first match of the start regex (or the
    /// beginning of the text) and ends after the first match of the end regex
    /// within the remainder (or the end of the text).
    pub fn extract<'a>(&self, text: &'a str) -> &'a str {
        let text = match self.start.find(text) {
            Some(m) => &text[m.start()..],
            None => text,
        };

        match self.end.find(text) {
            Some(m) => &text[..m.end()],
            None => text,
        }
    }
}

fn delimited_regex(pattern: &str) -> Result<Regex, IncludeError> {
    let inner = pattern
        .strip_prefix('/')
        .and_then(|p| p.strip_suffix('/'))
        .ok_or_else(|| IncludeError::MissingSeparators(pattern.to_string()))?;

    Regex::new(inner).map_err(|source| IncludeError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}

/// Resolve an include path below `root`, refusing anything that could leave it.
fn resolve(root: &Path, path: &str) -> Result<PathBuf, IncludeError> {
    let relative = Path::new(path);
    let contained = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

    if !contained || path.is_empty() {
        return Err(IncludeError::OutsideRoot(path.to_string()));
    }

    Ok(root.join(relative))
}

/// Read `path` below `root`, optionally narrowed by `address`.
///
/// The result has surrounding blank lines removed, ends in a single newline,
/// and is passed through [`undent`].
pub fn include_file(root: &Path, path: &str, address: &str) -> Result<String, IncludeError> {
    let full = resolve(root, path)?;
    let content = fs::read_to_string(&full).map_err(|source| IncludeError::Read {
        path: full.display().to_string(),
        source,
    })?;

    let selected = if address.is_empty() {
        content.as_str()
    } else {
        Address::parse(address)?.extract(&content)
    };

    let mut trimmed = selected.trim_matches(['\n', '\r']).to_string();
    trimmed.push('\n');

    Ok(undent(&trimmed))
}

/// Remove the first line's leading tabs from every line.
///
/// Lines containing `OMIT` are dropped before the first line is chosen. Lines
/// with fewer leading tabs lose only the tabs they have.
pub fn undent(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut ntabs = None;

    for line in text.lines().filter(|l| !l.contains(OMIT_MARKER)) {
        let n = *ntabs.get_or_insert_with(|| line.bytes().take_while(|&b| b == b'\t').count());

        let strip = line.bytes().take(n).take_while(|&b| b == b'\t').count();
        out.push_str(&line[strip..]);
        out.push('\n');
    }

    out
}

/// Tracks whether the scanner is inside a fenced code block.
#[derive(Default)]
struct FenceState {
    open: Option<(char, usize)>,
}

impl FenceState {
    /// Feed a line; returns true when the line opens or closes a fence.
    fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let Some(ch) = trimmed.chars().next().filter(|c| *c == '`' || *c == '~') else {
            return false;
        };
        let len = trimmed.chars().take_while(|c| *c == ch).count();
        if len < 3 {
            return false;
        }

        match self.open {
            None => {
                self.open = Some((ch, len));
                true
            }
            Some((open_ch, open_len)) if open_ch == ch && len >= open_len => {
                if trimmed[len..].trim().is_empty() {
                    self.open = None;
                    true
                } else {
                    false
                }
            }
            Some(_) => false,
        }
    }

    fn inside(&self) -> bool {
        self.open.is_some()
    }
}

/// Replace every include directive in `markdown` with the included text.
///
/// Directives inside fenced code blocks are left alone. Text spliced by a
/// plain include is expanded again, up to [`MAX_INCLUDE_DEPTH`] levels; code
/// includes stay literal. A failed include does not fail the page: the error
/// message takes the place of the content.
pub fn expand_includes(markdown: &str, root: &Path) -> String {
    expand_at_depth(markdown, root, 0)
}

fn expand_at_depth(markdown: &str, root: &Path, depth: usize) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut fences = FenceState::default();

    for line in markdown.split_inclusive('\n') {
        let was_inside = fences.inside();
        if fences.update(line) || was_inside {
            out.push_str(line);
            continue;
        }

        let Some(caps) = DIRECTIVE.captures(line.trim_end_matches(['\n', '\r'])) else {
            out.push_str(line);
            continue;
        };

        let as_code = caps.get(1).is_some();
        let path = caps[2].trim();
        let address = caps.get(3).map_or("", |m| m.as_str());

        let included = if !as_code && depth >= MAX_INCLUDE_DEPTH {
            Err(IncludeError::TooDeep(path.to_string()))
        } else {
            include_file(root, path, address)
        };

        let text = match included {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to include {}: {}", path, e);
                format!("{}\n", e)
            }
        };

        if as_code {
            push_code_block(&mut out, path, &text);
        } else if text.contains("{{") {
            out.push_str(&expand_at_depth(&text, root, depth + 1));
        } else {
            out.push_str(&text);
        }
    }

    out
}

fn push_code_block(out: &mut String, path: &str, text: &str) {
    let longest = text
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat((longest + 1).max(3));

    out.push_str(&fence);
    out.push_str(language_for(path));
    out.push('\n');
    out.push_str(text);
    if !text.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&fence);
    out.push('\n');
}

/// Code fence info string for an included file.
fn language_for(path: &str) -> &str {
    match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some("rs") => "rust",
        Some(ext) => ext,
        None => "",
    }
}
