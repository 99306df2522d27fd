//! Content check command.

use std::path::Path;

use anyhow::Result;
use guidebook_catalog::{load_all, Catalog};

use crate::config;

/// Load the catalog and report every document that was left out.
///
/// The load itself is never strict so that all problems are listed at once.
pub async fn run(config_path: &Path, strict: bool) -> Result<()> {
    let file_config = config::load(config_path)?;
    let strict = strict || file_config.catalog.strict;
    let root = file_config.content_dir();
    let options = file_config.catalog_options(false);

    let catalog = tokio::task::spawn_blocking(move || load_all(&root, &options)).await??;

    report(&catalog);

    if strict && !catalog.issues().is_empty() {
        anyhow::bail!("{} document(s) have problems", catalog.issues().len());
    }

    Ok(())
}

fn report(catalog: &Catalog) {
    for issue in catalog.issues() {
        tracing::warn!("{}", issue);
    }

    for category in catalog.categories() {
        tracing::info!("{}: {} topics", category.slug, category.topic_count);
    }

    tracing::info!(
        "{} topics in {} categories, {} issue(s)",
        catalog.len(),
        catalog.categories().len(),
        catalog.issues().len()
    );
}
