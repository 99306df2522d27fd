//! Content server command.

use std::path::Path;

use anyhow::Result;
use guidebook_server::GuideServer;

use crate::config;

/// Run the content server.
pub async fn run(config_path: &Path, port: Option<u16>, open: bool) -> Result<()> {
    let file_config = config::load(config_path)?;
    let server_config = file_config.server_config(port, open);
    let site = file_config.site_config(None, false);

    tracing::info!(
        "Starting server for {} on port {}",
        site.content_dir.display(),
        server_config.port
    );

    GuideServer::new(server_config, &site)?.start().await?;

    Ok(())
}
