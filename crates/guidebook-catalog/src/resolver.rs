//! Topic lookup by `(category, slug)`.

use crate::catalog::Catalog;
use crate::model::{Category, Document};

impl Catalog {
    /// Look up a topic.
    ///
    /// Both segments come straight from a request URL. They are only used as
    /// keys into the index built at load time, never as filesystem paths.
    /// `None` is the ordinary answer for a bad URL.
    pub fn resolve(&self, category: &str, slug: &str) -> Option<&Document> {
        let entry = self.index.get(category)?;
        let position = *entry.topics.get(slug)?;
        self.documents.get(position)
    }

    /// Look up a category by slug.
    pub fn category(&self, slug: &str) -> Option<&Category> {
        let entry = self.index.get(slug)?;
        self.categories.get(entry.position)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use crate::repository::{load_all, CatalogOptions};

    #[test]
    fn resolves_known_topics_only() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("databases")).unwrap();
        fs::write(temp.path().join("databases/sql.md"), "---\ntitle: SQL\n---\n").unwrap();

        let catalog = load_all(temp.path(), &CatalogOptions::default()).unwrap();

        assert_eq!(catalog.resolve("databases", "sql").unwrap().meta.title, "SQL");
        assert!(catalog.resolve("databases", "nosql").is_none());
        assert!(catalog.resolve("security", "sql").is_none());
        assert!(catalog.resolve("databases", "sql.md").is_none());
        assert!(catalog.resolve("..", "databases").is_none());
        assert!(catalog.resolve("", "").is_none());

        assert_eq!(catalog.category("databases").unwrap().topic_count, 1);
        assert!(catalog.category("sql").is_none());
    }
}
