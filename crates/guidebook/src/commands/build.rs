//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use guidebook_site::SiteBuilder;

use crate::config;

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, strict: bool) -> Result<()> {
    tracing::info!("Building static site...");

    let file_config = config::load(config_path)?;
    let config = file_config.site_config(output, strict);

    let result = SiteBuilder::new(config)?.build().await?;

    tracing::info!(
        "Built {} topics in {} categories in {}ms",
        result.topics,
        result.categories,
        result.duration_ms
    );

    if result.skipped > 0 {
        tracing::warn!(
            "{} document(s) skipped, run 'guidebook check' for details",
            result.skipped
        );
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
