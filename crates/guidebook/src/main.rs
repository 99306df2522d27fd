//! Guidebook CLI - build and serve markdown interview guides.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "guidebook")]
#[command(about = "Static site generator and server for markdown interview guides")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to guidebook.toml config file
    #[arg(short, long, default_value = "guidebook.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a guidebook.toml and sample content
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the static site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail if any document cannot be loaded
        #[arg(long)]
        strict: bool,
    },

    /// Serve topics straight from the content directory
    Serve {
        /// Port to listen on (defaults to config or 7777)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Print every topic route as JSON
    Routes,

    /// Load the content and report problems
    Check {
        /// Exit with an error if any document has a problem
        #[arg(long)]
        strict: bool,
    },

    /// Preview a built site
    Preview {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to the configured output)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging, RUST_LOG takes precedence
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Build { output, strict } => {
            commands::build::run(&cli.config, output, strict).await?;
        }
        Commands::Serve { port, no_open } => {
            commands::serve::run(&cli.config, port, !no_open).await?;
        }
        Commands::Routes => {
            commands::routes::run(&cli.config).await?;
        }
        Commands::Check { strict } => {
            commands::check::run(&cli.config, strict).await?;
        }
        Commands::Preview { port, dir } => {
            commands::preview::run(&cli.config, port, dir).await?;
        }
    }

    Ok(())
}
