//! HTTP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};

use guidebook_catalog::{Catalog, CatalogCache, CatalogLoadError};
use guidebook_site::{PageController, PageOutcome, SiteConfig, SiteMeta, TemplateEngine};

/// Path of the JSON route list.
pub const ROUTES_PATH: &str = "/routes.json";

/// Configuration for the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Open browser on start
    pub open: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7777,
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Server error: {0}")]
    ServeError(String),

    #[error("Failed to load content: {0}")]
    Catalog(#[from] CatalogLoadError),

    #[error("Failed to set up templates: {0}")]
    TemplateError(String),
}

/// Shared server state.
pub struct AppState {
    cache: Arc<CatalogCache>,
    controller: PageController,
    templates: TemplateEngine,
    site: SiteMeta,
}

impl AppState {
    pub fn new(site: &SiteConfig, cache: Arc<CatalogCache>) -> Result<Self, ServerError> {
        Ok(Self {
            cache,
            controller: site.controller(),
            templates: TemplateEngine::new()
                .map_err(|e| ServerError::TemplateError(e.to_string()))?,
            site: site.site_meta(),
        })
    }
}

/// Topic server.
pub struct GuideServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl GuideServer {
    /// Create a new server for `site`.
    pub fn new(config: ServerConfig, site: &SiteConfig) -> Result<Self, ServerError> {
        let cache = Arc::new(CatalogCache::new(
            site.content_dir.clone(),
            site.catalog.clone(),
        ));

        Ok(Self {
            config,
            state: Arc::new(AppState::new(site, cache)?),
        })
    }

    /// Start the server.
    ///
    /// The catalog is loaded before the listener binds, so a missing or
    /// invalid content directory stops startup.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let catalog = self.state.cache.get().await?;
        tracing::info!(
            "Serving {} topics from {}",
            catalog.len(),
            catalog.root().display()
        );

        let app = router(Arc::clone(&self.state));

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        tracing::info!("Listening on http://{}", addr);

        // Open browser if configured
        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        Ok(())
    }
}

/// Build the router.
///
/// The route list is served at `/routes.json`, the same file the static
/// build writes. A `.` is never valid in a category slug, so the path cannot
/// collide with a category page.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route(ROUTES_PATH, get(routes_handler))
        .route("/{category}", get(category_handler))
        .route("/{category}/", get(category_handler))
        .route("/{category}/{topic}", get(topic_handler))
        .route("/{category}/{topic}/", get(topic_handler))
        .fallback(fallback_handler)
        .with_state(state)
}

/// Get the catalog or turn a load failure into a 500.
async fn catalog(state: &AppState) -> Result<Arc<Catalog>, Response> {
    state.cache.get().await.map_err(|e| {
        tracing::error!("Catalog unavailable: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Content unavailable").into_response()
    })
}

fn html(status: StatusCode, rendered: Result<String, minijinja::Error>) -> Response {
    match rendered {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

fn not_found(state: &AppState, catalog: &Catalog) -> Response {
    let nav = state.controller.navigation(catalog, None);
    html(
        StatusCode::NOT_FOUND,
        state.templates.render_not_found(&state.site, &nav),
    )
}

/// Handler for the index page.
async fn home_handler(State(state): State<Arc<AppState>>) -> Response {
    let catalog = match catalog(&state).await {
        Ok(catalog) => catalog,
        Err(response) => return response,
    };

    let view = state.controller.home(&catalog);
    html(StatusCode::OK, state.templates.render_home(&state.site, &view))
}

/// Handler for `/{category}`.
async fn category_handler(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Response {
    let catalog = match catalog(&state).await {
        Ok(catalog) => catalog,
        Err(response) => return response,
    };

    match state.controller.category(&catalog, &category) {
        PageOutcome::Found(view) => html(
            StatusCode::OK,
            state.templates.render_category(&state.site, &view),
        ),
        PageOutcome::NotFound => not_found(&state, &catalog),
    }
}

/// Handler for `/{category}/{topic}`.
async fn topic_handler(
    State(state): State<Arc<AppState>>,
    Path((category, topic)): Path<(String, String)>,
) -> Response {
    let catalog = match catalog(&state).await {
        Ok(catalog) => catalog,
        Err(response) => return response,
    };

    match state.controller.topic(&catalog, &category, &topic) {
        PageOutcome::Found(view) => html(
            StatusCode::OK,
            state.templates.render_topic(&state.site, &view),
        ),
        PageOutcome::NotFound => not_found(&state, &catalog),
    }
}

/// Handler for the static path list.
async fn routes_handler(State(state): State<Arc<AppState>>) -> Response {
    match catalog(&state).await {
        Ok(catalog) => Json(catalog.routes()).into_response(),
        Err(response) => response,
    }
}

async fn fallback_handler(State(state): State<Arc<AppState>>) -> Response {
    match catalog(&state).await {
        Ok(catalog) => not_found(&state, &catalog),
        Err(response) => response,
    }
}
