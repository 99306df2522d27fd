//! HTTP server for guidebook sites.
//!
//! Serves `/{category}/{topic}` straight from the shared content catalog,
//! with a regular 404 page for anything the catalog does not know.

pub mod server;

pub use server::{router, AppState, GuideServer, ServerConfig, ServerError, ROUTES_PATH};
