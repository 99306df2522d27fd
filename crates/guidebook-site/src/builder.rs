//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use guidebook_catalog::{
    Catalog, CatalogCache, CatalogLoadError, CatalogOptions, RelatedWeights, Route,
    DEFAULT_RELATED_LIMIT,
};

use crate::page::{normalize_base_url, PageController, PageOutcome};
use crate::templates::{SiteMeta, TemplateEngine};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Content root: one subdirectory per category
    pub content_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Base URL for the site
    pub base_url: String,

    /// Site title
    pub title: String,

    /// Related topics shown per page
    pub related_limit: usize,

    /// Related-topic scoring
    pub weights: RelatedWeights,

    /// Catalog loading options
    pub catalog: CatalogOptions,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            output_dir: PathBuf::from("dist"),
            base_url: "/".to_string(),
            title: "Interview Guides".to_string(),
            related_limit: DEFAULT_RELATED_LIMIT,
            weights: RelatedWeights::default(),
            catalog: CatalogOptions::default(),
        }
    }
}

impl SiteConfig {
    /// Page controller for this configuration.
    pub fn controller(&self) -> PageController {
        PageController::new(&self.base_url, self.related_limit, self.weights)
    }

    pub fn site_meta(&self) -> SiteMeta {
        SiteMeta {
            title: self.title.clone(),
            base_url: normalize_base_url(&self.base_url),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of topic pages generated
    pub topics: usize,

    /// Number of category pages generated
    pub categories: usize,

    /// Documents left out because they failed to load
    pub skipped: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to load content: {0}")]
    Catalog(#[from] CatalogLoadError),

    #[error("Route {0} is listed but does not resolve")]
    MissingRoute(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

impl From<minijinja::Error> for BuildError {
    fn from(e: minijinja::Error) -> Self {
        Self::TemplateError(e.to_string())
    }
}

/// Static site builder.
pub struct SiteBuilder {
    config: SiteConfig,
    cache: Arc<CatalogCache>,
    controller: PageController,
    templates: TemplateEngine,
}

impl SiteBuilder {
    /// Create a new builder that loads its catalog from `config.content_dir`.
    pub fn new(config: SiteConfig) -> Result<Self, BuildError> {
        let cache = Arc::new(CatalogCache::new(
            config.content_dir.clone(),
            config.catalog.clone(),
        ));
        Self::with_cache(config, cache)
    }

    /// Create a builder that shares an existing catalog cache.
    pub fn with_cache(config: SiteConfig, cache: Arc<CatalogCache>) -> Result<Self, BuildError> {
        Ok(Self {
            controller: config.controller(),
            templates: TemplateEngine::new()?,
            config,
            cache,
        })
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let catalog = self.cache.get().await?;

        fs::create_dir_all(&self.config.output_dir).map_err(write_error)?;

        let site = self.config.site_meta();
        let routes = catalog.routes();

        // Render topic pages in parallel
        routes
            .par_iter()
            .map(|route| self.build_topic(&catalog, &site, route))
            .collect::<Result<Vec<()>, BuildError>>()?;

        for category in catalog.categories() {
            if let PageOutcome::Found(view) = self.controller.category(&catalog, &category.slug) {
                let html = self.templates.render_category(&site, &view)?;
                self.write_page(&self.config.output_dir.join(&category.slug), html)?;
            }
        }

        let home = self.controller.home(&catalog);
        let html = self.templates.render_home(&site, &home)?;
        self.write_page(&self.config.output_dir, html)?;

        let not_found = self
            .templates
            .render_not_found(&site, &self.controller.navigation(&catalog, None))?;
        fs::write(self.config.output_dir.join("404.html"), not_found).map_err(write_error)?;

        self.generate_route_list(&routes)?;
        self.generate_sitemap(&catalog)?;

        let duration = start.elapsed();

        tracing::info!(
            "Rendered {} topics and {} categories to {}",
            routes.len(),
            catalog.categories().len(),
            self.config.output_dir.display()
        );

        Ok(BuildResult {
            topics: routes.len(),
            categories: catalog.categories().len(),
            skipped: catalog.issues().len(),
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Render one topic to `{output}/{category}/{topic}/index.html`.
    fn build_topic(&self, catalog: &Catalog, site: &SiteMeta, route: &Route) -> Result<(), BuildError> {
        let PageOutcome::Found(view) = self.controller.topic(catalog, &route.category, &route.topic)
        else {
            return Err(BuildError::MissingRoute(route.to_string()));
        };

        let html = self.templates.render_topic(site, &view)?;
        let dir = self
            .config
            .output_dir
            .join(&route.category)
            .join(&route.topic);

        self.write_page(&dir, html)
    }

    /// Write `html` as `dir/index.html`.
    fn write_page(&self, dir: &Path, html: String) -> Result<(), BuildError> {
        fs::create_dir_all(dir).map_err(write_error)?;
        fs::write(dir.join("index.html"), html).map_err(write_error)
    }

    /// Write the static path list consumed by other build steps.
    fn generate_route_list(&self, routes: &[Route]) -> Result<(), BuildError> {
        let json = serde_json::to_string_pretty(routes).map_err(write_error)?;

        fs::write(self.config.output_dir.join("routes.json"), json).map_err(write_error)
    }

    /// Generate sitemap.
    fn generate_sitemap(&self, catalog: &Catalog) -> Result<(), BuildError> {
        let mut urls = vec![sitemap_entry(&self.controller.url(""), None)];

        for category in catalog.categories() {
            urls.push(sitemap_entry(
                &self.controller.url(&format!("{}/", category.slug)),
                None,
            ));
        }

        for topic in catalog.all_topics() {
            let lastmod = topic
                .last_updated
                .map(|date| date.format("%Y-%m-%d").to_string());
            urls.push(sitemap_entry(&self.controller.url(&topic.path()), lastmod));
        }

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        fs::write(self.config.output_dir.join("sitemap.xml"), sitemap).map_err(write_error)?;

        // Also generate robots.txt
        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}sitemap.xml",
            self.controller.base_url()
        );
        fs::write(self.config.output_dir.join("robots.txt"), robots).map_err(write_error)?;

        Ok(())
    }
}

fn sitemap_entry(loc: &str, lastmod: Option<String>) -> String {
    let loc = escape_xml(loc);
    match lastmod {
        Some(date) => format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </url>",
            loc, date
        ),
        None => format!("  <url>\n    <loc>{}</loc>\n  </url>", loc),
    }
}

/// Escape text for use inside an XML element.
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn write_error(e: impl std::fmt::Display) -> BuildError {
    BuildError::WriteError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site(temp: &Path) -> SiteConfig {
        let content = temp.join("content");
        write(
            &content,
            "databases/sql-interview-questions.md",
            "---\ntitle: SQL Interview Questions\ntags: [sql, performance]\nlastUpdated: 2024-06-01\n---\n# SQL\n",
        );
        write(
            &content,
            "databases/nosql-interview-questions.md",
            "---\ntitle: NoSQL Interview Questions\ntags: [nosql, performance]\n---\n# NoSQL\n",
        );
        write(
            &content,
            "security/security-monitoring-interview-questions.md",
            "---\ntitle: Security Monitoring\ntags: [security]\n---\n# Monitoring\n",
        );

        SiteConfig {
            content_dir: content,
            output_dir: temp.join("dist"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn builds_every_route() {
        let temp = tempdir().unwrap();
        let config = site(temp.path());
        let out = config.output_dir.clone();

        let result = SiteBuilder::new(config).unwrap().build().await.unwrap();

        assert_eq!(result.topics, 3);
        assert_eq!(result.categories, 2);
        assert_eq!(result.skipped, 0);
        assert!(out.join("index.html").exists());
        assert!(out.join("404.html").exists());
        assert!(out.join("databases/index.html").exists());
        assert!(out
            .join("databases/sql-interview-questions/index.html")
            .exists());
        assert!(out
            .join("security/security-monitoring-interview-questions/index.html")
            .exists());

        let sql = fs::read_to_string(out.join("databases/sql-interview-questions/index.html")).unwrap();
        assert!(sql.contains("/databases/nosql-interview-questions/"));
        assert!(!sql.contains(r#"href="/security/security-monitoring-interview-questions/">Security"#));
    }

    #[tokio::test]
    async fn writes_route_list_matching_pages() {
        let temp = tempdir().unwrap();
        let config = site(temp.path());
        let out = config.output_dir.clone();

        SiteBuilder::new(config).unwrap().build().await.unwrap();

        let routes: Vec<Route> =
            serde_json::from_str(&fs::read_to_string(out.join("routes.json")).unwrap()).unwrap();
        assert_eq!(routes.len(), 3);
        for route in routes {
            assert!(out
                .join(&route.category)
                .join(&route.topic)
                .join("index.html")
                .exists());
        }
    }

    #[tokio::test]
    async fn generates_sitemap() {
        let temp = tempdir().unwrap();
        let config = SiteConfig {
            base_url: "https://example.com".to_string(),
            ..site(temp.path())
        };
        let out = config.output_dir.clone();

        SiteBuilder::new(config).unwrap().build().await.unwrap();

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://example.com/databases/sql-interview-questions/</loc>"));
        assert!(sitemap.contains("<lastmod>2024-06-01</lastmod>"));

        let robots = fs::read_to_string(out.join("robots.txt")).unwrap();
        assert!(robots.ends_with("Sitemap: https://example.com/sitemap.xml"));
    }

    #[tokio::test]
    async fn escapes_sitemap_urls() {
        let temp = tempdir().unwrap();
        let config = SiteConfig {
            base_url: "https://example.com/?a=1&b=<2>".to_string(),
            ..site(temp.path())
        };
        let out = config.output_dir.clone();

        SiteBuilder::new(config).unwrap().build().await.unwrap();

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://example.com/?a=1&amp;b=&lt;2&gt;/</loc>"));
        assert!(!sitemap.contains("&b="));
    }

    #[test]
    fn escapes_xml_text() {
        assert_eq!(escape_xml("a&b<c>d"), "a&amp;b&lt;c&gt;d");
        assert_eq!(escape_xml("/databases/sql/"), "/databases/sql/");
    }

    #[tokio::test]
    async fn missing_content_dir_fails_the_build() {
        let temp = tempdir().unwrap();
        let config = SiteConfig {
            content_dir: temp.path().join("missing"),
            output_dir: temp.path().join("dist"),
            ..Default::default()
        };

        let result = SiteBuilder::new(config).unwrap().build().await;

        assert!(matches!(
            result,
            Err(BuildError::Catalog(CatalogLoadError::RootNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn strict_build_rejects_broken_documents() {
        let temp = tempdir().unwrap();
        let mut config = site(temp.path());
        write(&config.content_dir, "databases/broken.md", "---\ntitle: [\n---\n");

        let lenient = SiteBuilder::new(config.clone()).unwrap().build().await.unwrap();
        assert_eq!(lenient.skipped, 1);

        config.catalog.strict = true;
        let strict = SiteBuilder::new(config).unwrap().build().await;
        assert!(matches!(
            strict,
            Err(BuildError::Catalog(CatalogLoadError::Rejected { .. }))
        ));
    }
}
