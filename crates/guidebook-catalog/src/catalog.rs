//! The immutable, in-memory content catalog.

use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::error::DocumentParseError;
use crate::model::{humanize, Category, CategoryConfig, Document, TopicMeta};

/// Position of one category inside the catalog.
#[derive(Debug, Clone)]
pub(crate) struct CategoryIndex {
    /// Index into `Catalog::categories`
    pub(crate) position: usize,
    /// Contiguous run of this category's documents in `Catalog::documents`
    pub(crate) range: Range<usize>,
    /// Topic slug -> index into `Catalog::documents`
    pub(crate) topics: HashMap<String, usize>,
}

/// All documents and categories found under a content root.
///
/// Built once by [`crate::load_all`] and never mutated afterwards, so a
/// shared reference can be read from any number of threads.
#[derive(Debug)]
pub struct Catalog {
    pub(crate) root: PathBuf,
    pub(crate) categories: Vec<Category>,
    /// Sorted by category display order, then topic order, then slug
    pub(crate) documents: Vec<Document>,
    pub(crate) index: HashMap<String, CategoryIndex>,
    pub(crate) issues: Vec<DocumentParseError>,
}

impl Catalog {
    /// Assemble a catalog from documents whose `(category, slug)` pairs are unique.
    ///
    /// One category is created per distinct document category, so there are
    /// no empty or orphan categories. `configs` supplies display settings.
    pub(crate) fn assemble(
        root: PathBuf,
        mut documents: Vec<Document>,
        configs: &HashMap<String, CategoryConfig>,
        issues: Vec<DocumentParseError>,
    ) -> Self {
        let mut categories: Vec<Category> = Vec::new();
        for doc in &documents {
            let slug = &doc.meta.category;
            if categories.iter().any(|c| &c.slug == slug) {
                continue;
            }
            let config = configs.get(slug).cloned().unwrap_or_default();
            categories.push(Category {
                slug: slug.clone(),
                title: config.title.unwrap_or_else(|| humanize(slug)),
                description: config.description,
                order: config.order,
                topic_count: 0,
            });
        }

        categories.sort_by(|a, b| {
            (a.order.is_none(), a.order, &a.slug).cmp(&(b.order.is_none(), b.order, &b.slug))
        });

        let positions: HashMap<String, usize> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.slug.clone(), i))
            .collect();

        let position_of = |doc: &Document| positions.get(&doc.meta.category).copied().unwrap_or(0);

        documents.sort_by(|a, b| {
            let key = |d: &Document| (position_of(d), d.meta.order.is_none(), d.meta.order);
            key(a)
                .cmp(&key(b))
                .then_with(|| a.meta.slug.cmp(&b.meta.slug))
        });

        let mut index: HashMap<String, CategoryIndex> = HashMap::new();
        for (i, doc) in documents.iter().enumerate() {
            let entry = index
                .entry(doc.meta.category.clone())
                .or_insert_with(|| CategoryIndex {
                    position: position_of(doc),
                    range: i..i,
                    topics: HashMap::new(),
                });
            entry.range.end = i + 1;
            entry.topics.insert(doc.meta.slug.clone(), i);
        }

        for (slug, entry) in &index {
            debug_assert_eq!(&categories[entry.position].slug, slug);
            categories[entry.position].topic_count = entry.topics.len();
        }

        Self {
            root,
            categories,
            documents,
            index,
            issues,
        }
    }

    /// Content root the catalog was loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All categories in display order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All documents, grouped by category in display order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Metadata of every topic, without bodies.
    pub fn all_topics(&self) -> impl Iterator<Item = &TopicMeta> {
        self.documents.iter().map(|doc| &doc.meta)
    }

    /// Metadata of the topics in one category. Empty for an unknown category.
    pub fn topics_in(&self, category: &str) -> impl Iterator<Item = &TopicMeta> {
        let documents = match self.index.get(category) {
            Some(entry) => &self.documents[entry.range.clone()],
            None => &self.documents[0..0],
        };
        documents.iter().map(|doc| &doc.meta)
    }

    /// Files that were skipped while loading.
    pub fn issues(&self) -> &[DocumentParseError] {
        &self.issues
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
