//! Content catalog for a markdown topic site.
//!
//! Walks a content directory where each first-level subdirectory is a
//! category and each markdown file a topic, then answers the questions a page
//! needs: which topic lives at `/{category}/{topic}`, which topics are related
//! to it, and which routes exist at all.

pub mod cache;
pub mod catalog;
pub mod error;
pub mod model;
pub mod related;
pub mod repository;
pub mod resolver;
pub mod routes;

pub use cache::CatalogCache;
pub use catalog::Catalog;
pub use error::{CatalogLoadError, DocumentParseError, IssueKind};
pub use model::{humanize, Category, CategoryConfig, Document, TopicMeta};
pub use related::{related_to, RelatedTopic, RelatedWeights, DEFAULT_RELATED_LIMIT};
pub use repository::{load_all, CatalogOptions};
pub use routes::Route;

pub use guidebook_content::{Difficulty, TocEntry};
