// src/api/mod.rs
// HTTP + WebSocket surface

pub mod http;
pub mod origin;
pub mod ws;

use std::sync::Arc;

use axum::{Router, routing::get};

pub use origin::AllowedOrigins;

use crate::state::AppState;

/// Build the router with the WebSocket endpoint and health probes.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()`;
/// the WebSocket handler logs the peer address.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = state.origins.cors_layer();

    Router::new()
        .route("/ws", get(ws::ws_poem_handler))
        .route("/health", get(http::health_check))
        .route("/live", get(http::liveness_check))
        .layer(cors)
        .with_state(state)
}
