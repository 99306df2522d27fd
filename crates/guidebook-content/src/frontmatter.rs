//! Frontmatter extraction and parsing.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Difficulty level of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Senior,
    Expert,
    /// No difficulty was given in the frontmatter
    #[default]
    Unspecified,
}

impl Difficulty {
    /// Lowercase name as written in frontmatter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Senior => "senior",
            Self::Expert => "expert",
            Self::Unspecified => "unspecified",
        }
    }

    pub fn is_specified(&self) -> bool {
        *self != Self::Unspecified
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            "senior" => Ok(Self::Senior),
            "expert" => Ok(Self::Expert),
            "" | "unspecified" => Ok(Self::Unspecified),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// Parsed frontmatter from a content file.
///
/// Every field is optional. Missing values fall back to the documented
/// defaults: no title (the caller derives one from the slug), unspecified
/// difficulty, an empty tag set.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Frontmatter {
    /// Page title
    pub title: Option<String>,

    /// Short summary for listings and meta tags
    pub description: Option<String>,

    /// Difficulty level
    #[serde(deserialize_with = "deserialize_difficulty")]
    pub difficulty: Difficulty,

    /// Reading time in minutes, as stated by the author
    #[serde(alias = "estimated_read_time", deserialize_with = "deserialize_read_time")]
    pub estimated_read_time: Option<u32>,

    /// Tags, trimmed and lowercased
    #[serde(deserialize_with = "deserialize_tags")]
    pub tags: BTreeSet<String>,

    /// Date the content was last revised
    #[serde(alias = "last_updated", deserialize_with = "deserialize_date")]
    pub last_updated: Option<NaiveDate>,

    /// Order within the category (lower = first)
    pub order: Option<i32>,
}

fn deserialize_difficulty<'de, D>(deserializer: D) -> Result<Difficulty, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => raw.parse().map_err(de::Error::custom),
        None => Ok(Difficulty::Unspecified),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawReadTime {
    Minutes(u32),
    Text(String),
}

/// Accepts `5` as well as `"5 min"`.
fn deserialize_read_time<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawReadTime>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawReadTime::Minutes(minutes)) => Ok(Some(minutes)),
        Some(RawReadTime::Text(text)) => {
            let digits: String = text
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits
                .parse()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid read time '{}'", text)))
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    Many(Vec<String>),
    One(String),
}

/// Accepts a YAML list or a single comma-separated string.
fn deserialize_tags<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = match Option::<RawTags>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawTags::Many(tags)) => tags,
        Some(RawTags::One(line)) => line.split(',').map(str::to_string).collect(),
    };

    Ok(raw
        .iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect())
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| de::Error::custom(format!("invalid date '{}'", raw)))
}

/// Extract frontmatter from document source.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start_matches('\u{feff}').trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();

    // Skip the rest of the closing fence line
    let after_close = &after_open[close_pos + 4..];
    let remaining = match after_close.find('\n') {
        Some(newline) => &after_close[newline + 1..],
        None => "",
    };

    let frontmatter: Frontmatter = if yaml_content.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: SQL Interview Questions
description: Common SQL questions
difficulty: Intermediate
estimatedReadTime: 12
tags: [SQL, performance]
lastUpdated: 2024-03-01
order: 2
---

# SQL
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title.as_deref(), Some("SQL Interview Questions"));
        assert_eq!(fm.difficulty, Difficulty::Intermediate);
        assert_eq!(fm.estimated_read_time, Some(12));
        assert_eq!(
            fm.tags.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["performance", "sql"]
        );
        assert_eq!(fm.last_updated, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(fm.order, Some(2));
        assert!(content.starts_with("# SQL"));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let (fm, _) = extract_frontmatter("---\ntitle: Only a title\n---\nBody").unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.difficulty, Difficulty::Unspecified);
        assert!(fm.tags.is_empty());
        assert_eq!(fm.estimated_read_time, None);
        assert_eq!(fm.last_updated, None);
        assert_eq!(fm.description, None);
    }

    #[test]
    fn empty_block_is_default() {
        let (fm, content) = extract_frontmatter("---\n---\nBody").unwrap();

        assert_eq!(fm, Some(Frontmatter::default()));
        assert_eq!(content, "Body");
    }

    #[test]
    fn accepts_loose_value_shapes() {
        let source = "---\ntags: \"sql, , Joins \"\nestimated_read_time: 7 min\nlast_updated: 2024-05-06T10:00:00Z\ndifficulty:\n---\n";

        let (fm, _) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.tags.len(), 2);
        assert!(fm.tags.contains("joins"));
        assert_eq!(fm.estimated_read_time, Some(7));
        assert_eq!(fm.last_updated, NaiveDate::from_ymd_opt(2024, 5, 6));
        assert_eq!(fm.difficulty, Difficulty::Unspecified);
    }

    #[test]
    fn ignores_unknown_keys() {
        let (fm, _) = extract_frontmatter("---\ntitle: T\nauthor: someone\n---\n").unwrap();
        assert_eq!(fm.unwrap().title.as_deref(), Some("T"));
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn errors_on_unknown_difficulty() {
        let result = extract_frontmatter("---\ndifficulty: wizard\n---\n");
        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(msg)) if msg.contains("wizard")));
    }

    #[test]
    fn errors_on_bad_date() {
        let result = extract_frontmatter("---\nlastUpdated: last tuesday\n---\n");
        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn difficulty_round_trips_through_display() {
        for level in [
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
            Difficulty::Senior,
            Difficulty::Expert,
        ] {
            assert_eq!(level.to_string().parse::<Difficulty>(), Ok(level));
        }
    }
}
