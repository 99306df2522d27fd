//! Route enumeration for static generation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// One `/{category}/{topic}` page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Route {
    pub category: String,
    pub topic: String,
}

impl Route {
    pub fn new(category: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            topic: topic.into(),
        }
    }

    /// URL path with a trailing slash, e.g. `/databases/sql/`.
    pub fn path(&self) -> String {
        format!("/{}/{}/", self.category, self.topic)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.topic)
    }
}

impl Catalog {
    /// Every topic route, once each, in catalog order.
    ///
    /// Each returned route resolves with [`Catalog::resolve`], and every
    /// resolvable topic appears here.
    pub fn routes(&self) -> Vec<Route> {
        self.all_topics()
            .map(|meta| Route::new(meta.category.as_str(), meta.slug.as_str()))
            .collect()
    }
}
