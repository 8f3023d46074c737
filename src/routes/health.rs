//! Liveness and capability descriptor

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Descriptor returned by `GET /health` and `GET /analyze`
#[derive(Serialize)]
pub struct ServiceDescriptor {
    status: &'static str,
    version: &'static str,
    models: [&'static str; 2],
    /// Whether upstream analysis credentials are configured.
    configured: bool,
}

pub async fn descriptor(State(state): State<AppState>) -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        models: ["read", "layout"],
        configured: state.analysis().is_some(),
    })
}
