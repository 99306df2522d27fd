//! Markdown document parser with typed frontmatter.
//!
//! This crate turns the raw text of a content file into a structured document:
//! a typed metadata record, the markdown body, a table of contents and the
//! figures needed to estimate reading time.

pub mod frontmatter;
pub mod parser;

pub use frontmatter::{Difficulty, Frontmatter, FrontmatterError};
pub use parser::{
    estimate_read_time, markdown_options, parse_document, slugify, ParseError, ParsedDoc, TocEntry,
    WORDS_PER_MINUTE,
};
