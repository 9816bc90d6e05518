pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod schema;
pub mod store;
pub mod telemetry;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use larder_core::RecipeScraper;
use tower_http::services::ServeDir;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<db::DbPool>,
    pub scraper: RecipeScraper,
}

impl AppState {
    pub fn new(pool: db::DbPool, scraper: RecipeScraper) -> Self {
        Self {
            pool: Arc::new(pool),
            scraper,
        }
    }
}

/// The complete HTTP surface: JSON API, HTML pages, static files and API docs.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .merge(api::pages::router())
        .merge(api::health::router())
        .nest("/api/recipes", api::recipes::router())
        .nest_service("/static", ServeDir::new(static_dir))
        .merge(swagger_ui)
        .with_state(state)
        .layer(telemetry::trace_layer())
}
