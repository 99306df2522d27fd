//! Page controller: turns catalog lookups into render-ready view models.

use pulldown_cmark::{html, CowStr, Event, Parser, Tag};
use serde::Serialize;

use guidebook_catalog::{
    related_to, Catalog, Category, RelatedWeights, TocEntry, TopicMeta, DEFAULT_RELATED_LIMIT,
};
use guidebook_content::markdown_options;

/// Result of looking up a page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome<T> {
    Found(T),
    NotFound,
}

impl<T> PageOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(view) => Some(view),
            Self::NotFound => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// A navigation item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavItem {
    /// Display title
    pub title: String,
    /// URL path
    pub path: String,
    /// Whether this is the active category
    pub active: bool,
}

/// Link to a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLink {
    pub slug: String,
    pub title: String,
    pub url: String,
}

/// A topic as shown in listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicCard {
    pub slug: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    /// `None` when unspecified
    pub difficulty: Option<String>,
    pub read_time: u32,
    pub tags: Vec<String>,
}

/// A related topic with its relevance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedCard {
    pub topic: TopicCard,
    pub category: String,
    pub score: u32,
    pub shared_tags: Vec<String>,
}

/// Everything needed to render a topic page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicView {
    pub topic: TopicCard,
    pub category: CategoryLink,
    /// Rendered body
    pub content: String,
    pub toc: Vec<TocEntry>,
    pub related: Vec<RelatedCard>,
    /// `YYYY-MM-DD`
    pub last_updated: Option<String>,
    /// Whether `read_time` was derived from the word count
    pub read_time_estimated: bool,
    pub nav: Vec<NavItem>,
}

/// A category page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView {
    pub category: CategoryLink,
    pub description: Option<String>,
    pub topics: Vec<TopicCard>,
    pub nav: Vec<NavItem>,
}

/// The home page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub categories: Vec<CategoryView>,
    pub topic_count: usize,
    pub nav: Vec<NavItem>,
}

/// Builds view models from a catalog.
#[derive(Debug, Clone)]
pub struct PageController {
    base_url: String,
    related_limit: usize,
    weights: RelatedWeights,
}

impl Default for PageController {
    fn default() -> Self {
        Self::new("/", DEFAULT_RELATED_LIMIT, RelatedWeights::default())
    }
}

impl PageController {
    pub fn new(base_url: &str, related_limit: usize, weights: RelatedWeights) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            related_limit,
            weights,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The page at `/{category}/{topic}`.
    pub fn topic(&self, catalog: &Catalog, category: &str, topic: &str) -> PageOutcome<TopicView> {
        let Some(document) = catalog.resolve(category, topic) else {
            tracing::debug!("No topic at {}/{}", category, topic);
            return PageOutcome::NotFound;
        };
        let Some(category) = catalog.category(&document.meta.category) else {
            return PageOutcome::NotFound;
        };

        let related = related_to(&document.meta, catalog, self.related_limit, &self.weights)
            .into_iter()
            .map(|related| RelatedCard {
                topic: self.card(related.topic),
                category: related.topic.category.clone(),
                score: related.score,
                shared_tags: related.shared_tags.iter().map(|t| t.to_string()).collect(),
            })
            .collect();

        PageOutcome::Found(TopicView {
            topic: self.card(&document.meta),
            category: self.category_link(category),
            content: render_markdown(&document.body, &document.toc),
            toc: document.toc.clone(),
            related,
            last_updated: document
                .meta
                .last_updated
                .map(|date| date.format("%Y-%m-%d").to_string()),
            read_time_estimated: document.meta.estimated_read_time.is_none(),
            nav: self.navigation(catalog, Some(category.slug.as_str())),
        })
    }

    /// The page at `/{category}`.
    pub fn category(&self, catalog: &Catalog, slug: &str) -> PageOutcome<CategoryView> {
        match catalog.category(slug) {
            Some(category) => PageOutcome::Found(self.category_view(catalog, category)),
            None => PageOutcome::NotFound,
        }
    }

    /// The site index.
    pub fn home(&self, catalog: &Catalog) -> HomeView {
        HomeView {
            categories: catalog
                .categories()
                .iter()
                .map(|category| self.category_view(catalog, category))
                .collect(),
            topic_count: catalog.len(),
            nav: self.navigation(catalog, None),
        }
    }

    /// Navigation entries, one per category.
    pub fn navigation(&self, catalog: &Catalog, active: Option<&str>) -> Vec<NavItem> {
        catalog
            .categories()
            .iter()
            .map(|category| NavItem {
                title: category.title.clone(),
                path: self.url(&format!("{}/", category.slug)),
                active: active == Some(category.slug.as_str()),
            })
            .collect()
    }

    /// Absolute URL of a site-relative path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    fn category_view(&self, catalog: &Catalog, category: &Category) -> CategoryView {
        CategoryView {
            category: self.category_link(category),
            description: category.description.clone(),
            topics: catalog
                .topics_in(&category.slug)
                .map(|topic| self.card(topic))
                .collect(),
            nav: self.navigation(catalog, Some(category.slug.as_str())),
        }
    }

    fn category_link(&self, category: &Category) -> CategoryLink {
        CategoryLink {
            slug: category.slug.clone(),
            title: category.title.clone(),
            url: self.url(&format!("{}/", category.slug)),
        }
    }

    fn card(&self, topic: &TopicMeta) -> TopicCard {
        TopicCard {
            slug: topic.slug.clone(),
            title: topic.title.clone(),
            url: self.url(&topic.path()),
            description: topic.description.clone(),
            difficulty: topic
                .difficulty
                .is_specified()
                .then(|| topic.difficulty.to_string()),
            read_time: topic.read_time(),
            tags: topic.tags.iter().cloned().collect(),
        }
    }
}

/// Ensure the base URL starts and ends with `/`.
pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') || trimmed.contains("://") {
        format!("{}/", trimmed)
    } else {
        format!("/{}/", trimmed)
    }
}

/// Render markdown to HTML, giving headings the ids listed in `toc`.
pub fn render_markdown(content: &str, toc: &[TocEntry]) -> String {
    let mut ids = toc.iter().map(|entry| entry.id.clone());

    let parser = Parser::new_ext(content, markdown_options()).map(|event| match event {
        Event::Start(Tag::Heading {
            level,
            id: None,
            classes,
            attrs,
        }) => Event::Start(Tag::Heading {
            level,
            id: ids.next().map(CowStr::from),
            classes,
            attrs,
        }),
        other => other,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}
