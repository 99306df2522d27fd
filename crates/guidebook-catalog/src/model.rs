//! Catalog data types.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use guidebook_content::{estimate_read_time, Difficulty, TocEntry};

/// Topic metadata without the body.
///
/// This is what listings, related-topic lists and route enumeration hand out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicMeta {
    /// Category slug (parent directory name)
    pub category: String,

    /// Topic slug (file stem)
    pub slug: String,

    /// Title from frontmatter, or the humanized slug
    pub title: String,

    pub description: Option<String>,

    pub difficulty: Difficulty,

    /// Read time as stated in frontmatter
    pub estimated_read_time: Option<u32>,

    pub tags: BTreeSet<String>,

    pub last_updated: Option<NaiveDate>,

    /// Order within the category (lower = first)
    pub order: Option<i32>,

    /// Words of prose in the body
    pub word_count: usize,

    /// Source file, relative to the content root
    pub source_path: PathBuf,
}

impl TopicMeta {
    /// Read time in minutes, estimated from the word count when not stated.
    pub fn read_time(&self) -> u32 {
        self.estimated_read_time
            .unwrap_or_else(|| estimate_read_time(self.word_count))
    }

    /// URL path of the topic page.
    pub fn path(&self) -> String {
        format!("/{}/{}/", self.category, self.slug)
    }

    pub fn is(&self, category: &str, slug: &str) -> bool {
        self.category == category && self.slug == slug
    }
}

/// A parsed content file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub meta: TopicMeta,

    /// Markdown body (without frontmatter)
    pub body: String,

    /// Headings of the body
    pub toc: Vec<TocEntry>,
}

/// A named grouping of documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    /// Configured display order
    pub order: Option<i32>,
    pub topic_count: usize,
}

/// Display settings for a category, keyed by slug in the site configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
}

/// Turn a slug into a display title: `sql-interview-questions` -> `Sql Interview Questions`.
pub fn humanize(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanizes_slugs() {
        assert_eq!(humanize("sql-interview-questions"), "Sql Interview Questions");
        assert_eq!(humanize("system_design"), "System Design");
        assert_eq!(humanize("--edge--case-"), "Edge Case");
        assert_eq!(humanize(""), "");
    }
}
