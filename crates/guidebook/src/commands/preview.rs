//! Preview server command.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::config;

/// Run the preview command.
pub async fn run(config_path: &Path, port: u16, dir: Option<PathBuf>) -> Result<()> {
    let dir = output_dir(config_path, dir)?;
    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'guidebook build' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    // Unknown paths get the generated 404 page
    let not_found = ServeFile::new(dir.join("404.html"));
    let app = Router::new().fallback_service(ServeDir::new(&dir).not_found_service(not_found));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Open browser
    let url = format!("http://{}", addr);
    let _ = open::that(&url);

    axum::serve(listener, app).await?;

    Ok(())
}

/// The directory to preview: `dir` if given, otherwise the build output.
fn output_dir(config_path: &Path, dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => Ok(config::load(config_path)?.site_config(None, false).output_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_to_the_configured_output() {
        let temp = tempfile::tempdir().unwrap();
        let config = temp.path().join("guidebook.toml");
        fs::write(&config, "[site]\noutput = \"public\"\n").unwrap();

        assert_eq!(output_dir(&config, None).unwrap(), temp.path().join("public"));
        assert_eq!(
            output_dir(&config, Some(PathBuf::from("elsewhere"))).unwrap(),
            PathBuf::from("elsewhere")
        );
    }

    #[test]
    fn defaults_to_dist_without_a_config_file() {
        let temp = tempfile::tempdir().unwrap();

        let dir = output_dir(&temp.path().join("guidebook.toml"), None).unwrap();

        assert_eq!(dir, PathBuf::from("dist"));
    }
}
