//! Page rendering and static site generation.
//!
//! [`PageController`] turns catalog lookups into view models, the
//! [`TemplateEngine`] renders them, and [`SiteBuilder`] writes a page for every
//! route the catalog enumerates.

pub mod builder;
pub mod page;
pub mod templates;

pub use builder::{BuildError, BuildResult, SiteBuilder, SiteConfig};
pub use page::{
    normalize_base_url, render_markdown, CategoryLink, CategoryView, HomeView, NavItem,
    PageController, PageOutcome, RelatedCard, TopicCard, TopicView,
};
pub use templates::{SiteMeta, TemplateEngine};
