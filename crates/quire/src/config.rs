//! Configuration file (docs.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use quire_static::SiteConfig;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub build: BuildSection,
}

#[derive(Debug, Deserialize)]
pub struct SiteSection {
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
    #[serde(default = "default_include_dir")]
    pub include_dir: PathBuf,
    /// Directory with root.html and page.html overriding the built-in templates
    pub template_dir: Option<PathBuf>,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_title")]
    pub title: String,
    /// Title for pages without one in their frontmatter
    #[serde(default = "default_title")]
    pub default_title: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            include_dir: default_include_dir(),
            template_dir: None,
            static_dir: default_static_dir(),
            title: default_title(),
            default_title: default_title(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BuildSection {
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}
fn default_include_dir() -> PathBuf {
    PathBuf::from("include")
}
fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}
fn default_title() -> String {
    "Documentation".to_string()
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_output() -> PathBuf {
    PathBuf::from("dist")
}

impl ConfigFile {
    /// Site settings for the page pipeline.
    pub fn site_config(&self) -> SiteConfig {
        SiteConfig {
            content_dir: self.site.content_dir.clone(),
            include_dir: self.site.include_dir.clone(),
            template_dir: self.site.template_dir.clone(),
            default_title: self.site.default_title.clone(),
            site_title: self.site.title.clone(),
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = tempdir().unwrap();

        let config = load_config(&temp.path().join("docs.toml")).unwrap();

        assert_eq!(config.site.content_dir, PathBuf::from("content"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.build.output, PathBuf::from("dist"));
    }

    #[test]
    fn reads_partial_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docs.toml");
        fs::write(
            &path,
            r#"
[site]
content_dir = "pages"
template_dir = "template"
default_title = "Untitled page"

[server]
port = 9000
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        let site = config.site_config();

        assert_eq!(site.content_dir, PathBuf::from("pages"));
        assert_eq!(site.include_dir, PathBuf::from("include"));
        assert_eq!(site.template_dir, Some(PathBuf::from("template")));
        assert_eq!(site.default_title, "Untitled page");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn rejects_malformed_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docs.toml");
        fs::write(&path, "[server]\nport = \"eighty\"\n").unwrap();

        let err = load_config(&path).unwrap_err();

        assert!(err.to_string().starts_with("Failed to parse"));
    }
}
