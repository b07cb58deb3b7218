// src/api/ws/mod.rs
// WebSocket endpoint: origin check, receive loop and per-prompt streaming

pub mod connection;
pub mod message;

use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{ConnectInfo, State, WebSocketUpgrade};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::{Sink, StreamExt};
use tokio::sync::mpsc;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

pub use connection::WebSocketConnection;
pub use message::{WsClientMessage, WsServerMessage};

use crate::error::{PoemError, PoemResult};
use crate::poem::{ChunkEvent, PoemOrchestrator, PoemRequest, StreamStats};
use crate::state::AppState;

/// Chunk events buffered between the orchestrator and the socket
const EVENT_BUFFER: usize = 32;

pub async fn ws_poem_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    if let Some(origin) = headers.get(header::ORIGIN) {
        let allowed = origin
            .to_str()
            .map(|o| app_state.origins.allows(o))
            .unwrap_or(false);
        if !allowed {
            warn!("Rejecting WebSocket upgrade from {} with origin {:?}", addr, origin);
            return (StatusCode::FORBIDDEN, "Origin not allowed").into_response();
        }
    }

    info!("WebSocket upgrade request from {}", addr);
    ws.on_upgrade(move |socket| handle_socket(socket, app_state, addr))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>, addr: SocketAddr) {
    let connection_start = Instant::now();
    let (sender, mut receiver) = socket.split();
    let connection = WebSocketConnection::new(sender);

    info!("WebSocket client connected from {}", addr);

    if let Err(e) = connection.send_connection_ready().await {
        error!("Failed to send connection ready message: {}", e);
        return;
    }

    // Prompts on one connection are served strictly one after another
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<WsClientMessage>(&text) {
                Ok(WsClientMessage::SendPrompt(request)) => {
                    let request_id = Uuid::new_v4();
                    let span = info_span!("poem_request", %request_id, %addr);
                    if let Err(e) = stream_poem(&app_state.orchestrator, &connection, request)
                        .instrument(span)
                        .await
                    {
                        debug!("Prompt from {} ended early: {}", addr, e);
                    }
                }
                Err(e) => {
                    warn!("Failed to parse message: {}", e);
                    let _ = connection.send_error(&PoemError::from(e)).await;
                }
            },
            Ok(Message::Ping(data)) => {
                if let Err(e) = connection.send_pong(data).await {
                    error!("Failed to send pong: {}", e);
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client initiated close");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
        }

        if connection.is_closed().await {
            break;
        }
    }

    connection.mark_closed().await;

    let duration = connection_start.elapsed();
    info!(
        "WebSocket client disconnected from {} after {:.2}s",
        addr,
        duration.as_secs_f64()
    );
}

/// Run one prompt through the orchestrator, forwarding every chunk event to
/// the client as it is produced, then report completion or failure.
pub async fn stream_poem<S>(
    orchestrator: &PoemOrchestrator,
    connection: &WebSocketConnection<S>,
    request: PoemRequest,
) -> PoemResult<StreamStats>
where
    S: Sink<Message> + Unpin + Send,
    S::Error: Display,
{
    let started = Instant::now();
    let (tx, mut rx) = mpsc::channel::<ChunkEvent>(EVENT_BUFFER);

    let forward = async move {
        while let Some(event) = rx.recv().await {
            if connection.is_closed().await {
                break;
            }
            if let Err(e) = connection
                .send_message(WsServerMessage::ReceivePoemStream(event))
                .await
            {
                warn!("Dropping poem stream, client unreachable: {}", e);
                break;
            }
        }
    };

    let (result, ()) = tokio::join!(orchestrator.handle(request, tx), forward);

    match &result {
        Ok(stats) => {
            info!(
                "Prompt served in {:.2}s ({} chunks sent)",
                started.elapsed().as_secs_f64(),
                stats.emitted
            );
            let _ = connection.send_message(WsServerMessage::complete(stats)).await;
        }
        Err(e) => {
            error!("Prompt failed after {:.2}s: {}", started.elapsed().as_secs_f64(), e);
            let _ = connection.send_error(e).await;
        }
    }

    result
}
