//! Document repository: discovers content files and builds the catalog.
//!
//! This is the only part of the crate that touches the filesystem.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::{DirEntry, WalkDir};

use guidebook_content::parse_document;

use crate::catalog::Catalog;
use crate::error::{CatalogLoadError, DocumentParseError, IssueKind};
use crate::model::{humanize, CategoryConfig, Document, TopicMeta};

/// File extensions treated as content.
const CONTENT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Options controlling how a catalog is loaded.
#[derive(Debug, Clone, Default)]
pub struct CatalogOptions {
    /// Fail the whole load when any single document fails
    pub strict: bool,

    /// Display settings per category slug
    pub categories: HashMap<String, CategoryConfig>,
}

/// A discovered content file, before parsing.
#[derive(Debug)]
enum Candidate {
    Topic {
        path: PathBuf,
        relative: PathBuf,
    },
    Skipped(DocumentParseError),
}

/// Load every document under `root` into a catalog.
///
/// Category is the name of a file's parent directory and slug is its file
/// stem. A file that cannot be read or parsed is skipped and recorded in
/// [`Catalog::issues`], unless `options.strict` is set, in which case the whole
/// load fails with [`CatalogLoadError::Rejected`]. Two files mapping to the same
/// `(category, slug)` always fail the load.
pub fn load_all(root: &Path, options: &CatalogOptions) -> Result<Catalog, CatalogLoadError> {
    let start = Instant::now();

    if !root.exists() {
        return Err(CatalogLoadError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(CatalogLoadError::RootNotDirectory(root.to_path_buf()));
    }

    let candidates = discover(root)?;

    let loaded: Vec<Result<Document, DocumentParseError>> = candidates
        .into_par_iter()
        .map(|candidate| match candidate {
            Candidate::Topic { path, relative } => load_document(&path, relative),
            Candidate::Skipped(issue) => Err(issue),
        })
        .collect();

    let mut documents = Vec::with_capacity(loaded.len());
    let mut issues = Vec::new();
    let mut seen: HashMap<(String, String), PathBuf> = HashMap::new();

    for result in loaded {
        match result {
            Ok(doc) => {
                let key = (doc.meta.category.clone(), doc.meta.slug.clone());
                if let Some(first) = seen.get(&key) {
                    return Err(CatalogLoadError::DuplicateTopic {
                        category: key.0,
                        slug: key.1,
                        first: first.clone(),
                        second: doc.meta.source_path.clone(),
                    });
                }
                seen.insert(key, doc.meta.source_path.clone());
                documents.push(doc);
            }
            Err(issue) => {
                tracing::warn!("Skipping {}", issue);
                issues.push(issue);
            }
        }
    }

    if options.strict && !issues.is_empty() {
        return Err(CatalogLoadError::Rejected { issues });
    }

    let catalog = Catalog::assemble(root.to_path_buf(), documents, &options.categories, issues);

    tracing::info!(
        "Loaded {} topics in {} categories from {} in {}ms ({} skipped)",
        catalog.len(),
        catalog.categories().len(),
        root.display(),
        start.elapsed().as_millis(),
        catalog.issues().len()
    );

    Ok(catalog)
}

/// Walk the content tree in file-name order.
fn discover(root: &Path) -> Result<Vec<Candidate>, CatalogLoadError> {
    let mut candidates = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(CatalogLoadError::Walk {
                    root: root.to_path_buf(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                candidates.push(Candidate::Skipped(DocumentParseError::new(
                    relative_to(root, &path),
                    IssueKind::Read(e.to_string()),
                )));
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_content_file(entry.path()) {
            continue;
        }

        let relative = relative_to(root, entry.path());
        if entry.depth() < 2 {
            candidates.push(Candidate::Skipped(DocumentParseError::new(
                relative,
                IssueKind::Uncategorized,
            )));
            continue;
        }

        candidates.push(Candidate::Topic {
            path: entry.path().to_path_buf(),
            relative,
        });
    }

    Ok(candidates)
}

/// Read and parse one file into a document.
fn load_document(path: &Path, relative: PathBuf) -> Result<Document, DocumentParseError> {
    let issue = |kind| DocumentParseError::new(relative.clone(), kind);

    let category = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .ok_or_else(|| issue(IssueKind::Uncategorized))?
        .to_string();
    if !is_valid_segment(&category) {
        return Err(issue(IssueKind::InvalidSlug(category)));
    }

    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| issue(IssueKind::InvalidSlug(path.display().to_string())))?
        .to_string();
    if !is_valid_segment(&slug) {
        return Err(issue(IssueKind::InvalidSlug(slug)));
    }

    let source = fs::read_to_string(path).map_err(|e| issue(IssueKind::Read(e.to_string())))?;

    let parsed =
        parse_document(&source).map_err(|e| issue(IssueKind::Frontmatter(e.to_string())))?;

    if parsed.has_frontmatter {
        tracing::debug!("Parsed {}/{} from {}", category, slug, relative.display());
    } else {
        tracing::debug!(
            "Parsed {}/{} from {} without frontmatter, using defaults",
            category,
            slug,
            relative.display()
        );
    }

    let fm = parsed.frontmatter;
    let meta = TopicMeta {
        title: fm
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| humanize(&slug)),
        category,
        slug,
        description: fm.description,
        difficulty: fm.difficulty,
        estimated_read_time: fm.estimated_read_time,
        tags: fm.tags,
        last_updated: fm.last_updated,
        order: fm.order,
        word_count: parsed.word_count,
        source_path: relative,
    };

    Ok(Document {
        meta,
        body: parsed.content,
        toc: parsed.toc,
    })
}

/// Whether `segment` can be used verbatim as one URL path segment.
pub(crate) fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
