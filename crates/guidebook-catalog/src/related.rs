//! Related-topic ranking.
//!
//! Candidates are the topics that share the source's category or at least one
//! of its tags. Each signal adds a fixed, non-negative weight, so a candidate's
//! score can only grow as it shares more with the source. Ties are broken by
//! category then slug, which makes the ranking a pure function of the catalog.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::model::{Document, TopicMeta};

/// Default number of related topics shown on a page.
pub const DEFAULT_RELATED_LIMIT: usize = 4;

/// Score contributed by each shared signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedWeights {
    /// Candidate is in the source's category
    pub same_category: u32,
    /// Per tag shared with the source
    pub shared_tag: u32,
    /// Both difficulties are specified and equal
    pub same_difficulty: u32,
}

impl Default for RelatedWeights {
    fn default() -> Self {
        Self {
            same_category: 10,
            shared_tag: 5,
            same_difficulty: 2,
        }
    }
}

/// A ranked related topic, borrowed from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedTopic<'a> {
    pub topic: &'a TopicMeta,
    pub score: u32,
    /// Tags shared with the source, sorted
    pub shared_tags: Vec<&'a str>,
}

/// Rank the topics related to `source`, best first, at most `limit` of them.
///
/// The source itself is never included. Returns fewer than `limit` entries
/// when fewer candidates exist, and an empty list when none do.
pub fn related_to<'a>(
    source: &TopicMeta,
    catalog: &'a Catalog,
    limit: usize,
    weights: &RelatedWeights,
) -> Vec<RelatedTopic<'a>> {
    if limit == 0 {
        return Vec::new();
    }

    let mut related: Vec<RelatedTopic<'a>> = catalog
        .all_topics()
        .filter(|candidate| !candidate.is(&source.category, &source.slug))
        .filter_map(|candidate| score(source, candidate, weights))
        .collect();

    related.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.topic.category.cmp(&b.topic.category))
            .then_with(|| a.topic.slug.cmp(&b.topic.slug))
    });
    related.truncate(limit);
    related
}

/// Score one candidate, or `None` when it shares nothing with the source.
fn score<'a>(
    source: &TopicMeta,
    candidate: &'a TopicMeta,
    weights: &RelatedWeights,
) -> Option<RelatedTopic<'a>> {
    let same_category = candidate.category == source.category;
    let shared_tags: Vec<&'a str> = candidate
        .tags
        .iter()
        .filter(|tag| source.tags.contains(*tag))
        .map(String::as_str)
        .collect();

    if !same_category && shared_tags.is_empty() {
        return None;
    }

    let mut score = 0u32;
    if same_category {
        score = score.saturating_add(weights.same_category);
    }
    let tag_count = u32::try_from(shared_tags.len()).unwrap_or(u32::MAX);
    score = score.saturating_add(weights.shared_tag.saturating_mul(tag_count));
    if source.difficulty.is_specified() && source.difficulty == candidate.difficulty {
        score = score.saturating_add(weights.same_difficulty);
    }

    Some(RelatedTopic {
        topic: candidate,
        score,
        shared_tags,
    })
}

impl Catalog {
    /// Related topics for `document` with the default weights.
    pub fn related(&self, document: &Document, limit: usize) -> Vec<RelatedTopic<'_>> {
        related_to(&document.meta, self, limit, &RelatedWeights::default())
    }
}
