//! Route listing command.

use std::path::Path;

use anyhow::{Context, Result};
use guidebook_catalog::CatalogCache;

use crate::config;

/// Print every `/{category}/{topic}` route as a JSON array.
pub async fn run(config_path: &Path) -> Result<()> {
    let file_config = config::load(config_path)?;
    let cache = CatalogCache::new(file_config.content_dir(), file_config.catalog_options(false));

    let catalog = cache.get().await?;
    let json =
        serde_json::to_string_pretty(&catalog.routes()).context("Failed to serialize routes")?;

    println!("{}", json);

    Ok(())
}
