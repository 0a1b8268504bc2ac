use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, state::SharedState};

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Create the main application router with all API endpoints
pub fn create_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Calculation and its artifacts
        .route("/api/calculate", post(handlers::calculate))
        .route("/api/download/:file", get(handlers::download_report))
        .route("/api/template", get(handlers::download_template))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
