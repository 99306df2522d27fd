//! Catalog error types.

use std::path::PathBuf;

/// Fatal errors: the catalog could not be built at all.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("Content directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Content path is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("Failed to read content directory {}: {message}", .root.display())]
    Walk { root: PathBuf, message: String },

    #[error(
        "Duplicate topic {category}/{slug}: {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateTopic {
        category: String,
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("{} document(s) failed to load in strict mode", .issues.len())]
    Rejected { issues: Vec<DocumentParseError> },

    #[error("Catalog load task failed: {0}")]
    Interrupted(String),
}

/// A recoverable, per-file failure. The document is left out of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {kind}", .path.display())]
pub struct DocumentParseError {
    pub path: PathBuf,
    pub kind: IssueKind,
}

impl DocumentParseError {
    pub fn new(path: impl Into<PathBuf>, kind: IssueKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Why a document was skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IssueKind {
    #[error("unreadable file: {0}")]
    Read(String),

    #[error("malformed frontmatter: {0}")]
    Frontmatter(String),

    #[error("file is not inside a category directory")]
    Uncategorized,

    #[error("'{0}' is not a valid URL segment")]
    InvalidSlug(String),
}
