//! Markdown document parser.

use std::collections::HashMap;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// Reading speed used when a document does not state its own read time.
pub const WORDS_PER_MINUTE: usize = 200;

/// A parsed content document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (defaults when the file has none)
    pub frontmatter: Frontmatter,

    /// Whether the source carried a frontmatter block at all
    pub has_frontmatter: bool,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,

    /// Words of prose, code blocks excluded
    pub word_count: usize,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID, unique within the document
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing a document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Markdown extensions enabled for both parsing and rendering.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Parse a document.
///
/// Extracts frontmatter, builds a table of contents and counts prose words.
pub fn parse_document(source: &str) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;
    let has_frontmatter = frontmatter.is_some();

    let mut toc = Vec::new();
    let mut seen_ids: HashMap<String, usize> = HashMap::new();
    let mut word_count = 0;

    let mut in_code_block = false;
    let mut current_heading: Option<(u8, String)> = None; // (level, text)

    for event in Parser::new_ext(content, markdown_options()) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,

            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((level as u8, String::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let title = title.trim().to_string();
                    let id = unique_id(slugify(&title), &mut seen_ids);
                    toc.push(TocEntry { title, id, level });
                }
            }

            Event::Text(text) | Event::Code(text) => {
                if in_code_block {
                    continue;
                }
                if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
                word_count += text.split_whitespace().count();
            }

            _ => {}
        }
    }

    Ok(ParsedDoc {
        frontmatter: frontmatter.unwrap_or_default(),
        has_frontmatter,
        content: content.to_string(),
        toc,
        word_count,
    })
}

/// Minutes needed to read `words` words, never less than one.
pub fn estimate_read_time(words: usize) -> u32 {
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Suffix repeated heading ids with `-1`, `-2`, ...
fn unique_id(base: String, seen: &mut HashMap<String, usize>) -> String {
    let base = if base.is_empty() {
        "section".to_string()
    } else {
        base
    };

    let count = seen.entry(base.clone()).or_insert(0);
    let id = if *count == 0 {
        base
    } else {
        format!("{}-{}", base, count)
    };
    *count += 1;
    id
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::Difficulty;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_complete_document() {
        let source = r#"---
title: SQL Interview Questions
difficulty: advanced
tags: [sql]
---

# SQL Interview Questions

What does `JOIN` do

```sql
SELECT * FROM users u JOIN orders o ON o.user_id = u.id;
```

## Indexes

Explain covering indexes.
"#;

        let doc = parse_document(source).unwrap();

        assert!(doc.has_frontmatter);
        assert_eq!(doc.frontmatter.difficulty, Difficulty::Advanced);

        assert_eq!(
            doc.toc,
            vec![
                TocEntry {
                    title: "SQL Interview Questions".to_string(),
                    id: "sql-interview-questions".to_string(),
                    level: 1,
                },
                TocEntry {
                    title: "Indexes".to_string(),
                    id: "indexes".to_string(),
                    level: 2,
                },
            ]
        );

        // Code block words are not counted, inline code is
        assert_eq!(doc.word_count, 3 + 4 + 1 + 3);
        assert!(!doc.content.contains("difficulty:"));
    }

    #[test]
    fn parses_without_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter.";

        let doc = parse_document(source).unwrap();

        assert!(!doc.has_frontmatter);
        assert_eq!(doc.frontmatter, Frontmatter::default());
        assert_eq!(doc.toc.len(), 1);
        assert_eq!(doc.toc[0].title, "Just Markdown");
    }

    #[test]
    fn deduplicates_heading_ids() {
        let source = "## Example\n\n## Example\n\n## Example\n";

        let doc = parse_document(source).unwrap();
        let ids: Vec<_> = doc.toc.iter().map(|e| e.id.as_str()).collect();

        assert_eq!(ids, vec!["example", "example-1", "example-2"]);
    }

    #[test]
    fn propagates_frontmatter_errors() {
        let result = parse_document("---\ntitle: broken\n");
        assert!(matches!(
            result,
            Err(ParseError::Frontmatter(FrontmatterError::Unclosed))
        ));
    }

    #[test]
    fn read_time_is_estimated_from_prose() {
        let words = "word ".repeat(450);

        let doc = parse_document(&words).unwrap();
        assert_eq!(estimate_read_time(doc.word_count), 3);

        let stated = parse_document(&format!("---\nestimatedReadTime: 10\n---\n{}", words)).unwrap();
        assert_eq!(stated.frontmatter.estimated_read_time, Some(10));
    }

    #[test]
    fn empty_document_reads_in_one_minute() {
        assert_eq!(estimate_read_time(0), 1);
        assert_eq!(estimate_read_time(200), 1);
        assert_eq!(estimate_read_time(201), 2);
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("Button (Primary)"), "button-primary");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }
}
