//! Configuration file structure (guidebook.toml).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use guidebook_catalog::{CatalogOptions, CategoryConfig, RelatedWeights, DEFAULT_RELATED_LIMIT};
use guidebook_server::ServerConfig;
use guidebook_site::SiteConfig;

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub categories: HashMap<String, CategoryConfig>,
    #[serde(default)]
    pub server: ServerSection,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub title: String,
    pub base_url: String,
    pub content_dir: PathBuf,
    pub output: PathBuf,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Interview Guides".to_string(),
            base_url: "/".to_string(),
            content_dir: PathBuf::from("content"),
            output: PathBuf::from("dist"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    pub strict: bool,
    pub related_limit: usize,
    pub weights: RelatedWeights,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            strict: false,
            related_limit: DEFAULT_RELATED_LIMIT,
            weights: RelatedWeights::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        let defaults = ServerConfig::default();
        Self {
            host: defaults.host,
            port: defaults.port,
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No {} found, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut config = parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

fn parse(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

impl ConfigFile {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn catalog_options(&self, strict: bool) -> CatalogOptions {
        CatalogOptions {
            strict: strict || self.catalog.strict,
            categories: self.categories.clone(),
        }
    }

    pub fn content_dir(&self) -> PathBuf {
        self.resolve(&self.site.content_dir)
    }

    /// Site configuration, with command-line overrides applied.
    pub fn site_config(&self, output: Option<PathBuf>, strict: bool) -> SiteConfig {
        SiteConfig {
            content_dir: self.content_dir(),
            output_dir: output.unwrap_or_else(|| self.resolve(&self.site.output)),
            base_url: self.site.base_url.clone(),
            title: self.site.title.clone(),
            related_limit: self.catalog.related_limit,
            weights: self.catalog.weights,
            catalog: self.catalog_options(strict),
        }
    }

    pub fn server_config(&self, port: Option<u16>, open: bool) -> ServerConfig {
        ServerConfig {
            host: self.server.host.clone(),
            port: port.unwrap_or(self.server.port),
            open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse("").unwrap();

        assert_eq!(config.site.title, "Interview Guides");
        assert_eq!(config.site.content_dir, PathBuf::from("content"));
        assert_eq!(config.catalog.related_limit, DEFAULT_RELATED_LIMIT);
        assert_eq!(config.catalog.weights, RelatedWeights::default());
        assert_eq!(config.server.port, 7777);
        assert!(config.categories.is_empty());
    }

    #[test]
    fn parses_every_section() {
        let config = parse(
            r#"
            [site]
            title = "Backend Guides"
            base_url = "/guides/"

            [catalog]
            strict = true
            related_limit = 2

            [catalog.weights]
            shared_tag = 7

            [categories.databases]
            title = "Data Stores"
            order = 1

            [server]
            port = 8080
            "#,
        )
        .unwrap();

        assert_eq!(config.site.title, "Backend Guides");
        assert_eq!(config.site.output, PathBuf::from("dist"));
        assert!(config.catalog.strict);
        assert_eq!(config.catalog.weights.shared_tag, 7);
        assert_eq!(config.catalog.weights.same_category, 10);
        assert_eq!(
            config.categories["databases"].title.as_deref(),
            Some("Data Stores")
        );
        assert_eq!(config.server.host, "127.0.0.1");

        let site = config.site_config(None, false);
        assert!(site.catalog.strict);
        assert_eq!(site.related_limit, 2);
    }

    #[test]
    fn command_line_overrides_win() {
        let config = parse("[server]\nport = 8080\n").unwrap();

        let site = config.site_config(Some(PathBuf::from("public")), true);
        assert_eq!(site.output_dir, PathBuf::from("public"));
        assert!(site.catalog.strict);

        assert_eq!(config.server_config(Some(9000), false).port, 9000);
        assert_eq!(config.server_config(None, false).port, 8080);
    }

    #[test]
    fn paths_resolve_next_to_the_config_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("guidebook.toml");
        fs::write(&path, "[site]\ncontent_dir = \"guides\"\n").unwrap();

        let config = load(&path).unwrap();

        assert_eq!(config.content_dir(), temp.path().join("guides"));
        assert_eq!(
            config.site_config(None, false).output_dir,
            temp.path().join("dist")
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("guidebook.toml");
        fs::write(&path, "[site\n").unwrap();

        assert!(load(&path).is_err());
    }
}
