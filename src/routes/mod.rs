//! Route modules and router assembly

pub mod analyze;
pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Largest accepted document upload.
const MAX_DOCUMENT_SIZE: usize = 50 * 1024 * 1024;

/// Build the application router.
///
/// Unmatched methods on `/analyze` get the router's automatic 405.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::descriptor))
        .route(
            "/analyze",
            get(health::descriptor)
                .post(analyze::analyze)
                .options(analyze::preflight),
        )
        .layer(DefaultBodyLimit::max(MAX_DOCUMENT_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
