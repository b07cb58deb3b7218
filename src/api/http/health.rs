// src/api/http/health.rs
//
// Health and liveness endpoints for load balancers and container probes.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    generator: String,
    classifier: String,
}

/// Reports the configured generator and classifier.
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let generator = state.orchestrator.generator();
    let classifier = state.orchestrator.classifier();

    let response = HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        generator: format!("{}/{}", generator.name(), generator.model()),
        classifier: format!("{}/{}", classifier.name(), classifier.model()),
    };

    (StatusCode::OK, Json(response))
}

/// Liveness probe - simple ping to verify the server is running.
///
/// GET /live
pub async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "alive"})))
}
