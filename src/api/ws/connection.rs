// src/api/ws/connection.rs
// A wrapper around the WebSocket sink to manage state and message sending.

use std::fmt::Display;

use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use bytes::Bytes;
use futures_util::stream::SplitSink;
use futures_util::{Sink, SinkExt};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::message::WsServerMessage;
use crate::error::{PoemError, PoemResult};

/// Manages the state and sending logic for a single WebSocket connection.
pub struct WebSocketConnection<S = SplitSink<WebSocket, Message>> {
    sender: Mutex<S>,
    is_closed: Mutex<bool>,
}

impl<S> WebSocketConnection<S>
where
    S: Sink<Message> + Unpin + Send,
    S::Error: Display,
{
    /// Creates a new connection from the sending half of a socket.
    pub fn new(sender: S) -> Self {
        Self {
            sender: Mutex::new(sender),
            is_closed: Mutex::new(false),
        }
    }

    /// Mark this connection as closed to prevent further sends
    pub async fn mark_closed(&self) {
        *self.is_closed.lock().await = true;
        debug!("Connection marked as closed");
    }

    pub async fn is_closed(&self) -> bool {
        *self.is_closed.lock().await
    }

    /// Sends a structured `WsServerMessage` to the client with immediate flushing.
    pub async fn send_message(&self, msg: WsServerMessage) -> PoemResult<()> {
        if self.is_closed().await {
            debug!("Skipping send on closed connection");
            return Ok(());
        }

        let json_str = serde_json::to_string(&msg)?;
        debug!("Sending WS message: {}", json_str);

        self.send_frame(Message::Text(Utf8Bytes::from(json_str)))
            .await
    }

    /// Sends a `poem_error` carrying the error's wire code.
    pub async fn send_error(&self, err: &PoemError) -> PoemResult<()> {
        warn!("Sending error: {} (Code: {})", err, err.code());
        self.send_message(WsServerMessage::PoemError {
            message: err.to_string(),
            code: err.code().to_string(),
        })
        .await
    }

    /// Sends the greeting the client waits for before prompting.
    pub async fn send_connection_ready(&self) -> PoemResult<()> {
        self.send_message(WsServerMessage::ConnectionReady {
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
        .await?;

        info!("WebSocket connection ready message sent");
        Ok(())
    }

    /// Sends a pong response to a client's ping.
    pub async fn send_pong(&self, data: Bytes) -> PoemResult<()> {
        if self.is_closed().await {
            debug!("Skipping pong on closed connection");
            return Ok(());
        }

        debug!("Received ping, sending pong.");
        self.send_frame(Message::Pong(data)).await
    }

    async fn send_frame(&self, frame: Message) -> PoemResult<()> {
        let mut sender = self.sender.lock().await;

        if let Err(e) = sender.send(frame).await {
            warn!("Failed to send frame (connection likely closed): {}", e);
            drop(sender);
            self.mark_closed().await;
            return Err(PoemError::Transport(e.to_string()));
        }

        if let Err(e) = sender.flush().await {
            warn!("Failed to flush frame (connection likely closed): {}", e);
            drop(sender);
            self.mark_closed().await;
            return Err(PoemError::Transport(e.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use futures::channel::mpsc;
    use serde_json::Value;

    fn text_of(msg: Message) -> Value {
        match msg {
            Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("expected text frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn connection_ready_carries_version() {
        let (tx, mut rx) = mpsc::unbounded::<Message>();
        let connection = WebSocketConnection::new(tx);

        connection.send_connection_ready().await.unwrap();

        let frame = text_of(rx.next().await.unwrap());
        assert_eq!(frame["event"], "connection_ready");
        assert_eq!(frame["data"]["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn error_frame_uses_error_code() {
        let (tx, mut rx) = mpsc::unbounded::<Message>();
        let connection = WebSocketConnection::new(tx);

        connection
            .send_error(&PoemError::invalid_request("emotionVector must have 7 scores"))
            .await
            .unwrap();

        let frame = text_of(rx.next().await.unwrap());
        assert_eq!(frame["event"], "poem_error");
        assert_eq!(frame["data"]["code"], "invalid_request");
    }

    #[tokio::test]
    async fn failed_send_marks_connection_closed() {
        let (tx, rx) = mpsc::unbounded::<Message>();
        drop(rx);
        let connection = WebSocketConnection::new(tx);

        let result = connection.send_connection_ready().await;
        assert!(matches!(result, Err(PoemError::Transport(_))));
        assert!(connection.is_closed().await);

        // further sends are skipped quietly
        assert!(connection.send_pong(Bytes::from_static(b"p")).await.is_ok());
    }

    #[tokio::test]
    async fn pong_echoes_payload() {
        let (tx, mut rx) = mpsc::unbounded::<Message>();
        let connection = WebSocketConnection::new(tx);

        connection.send_pong(Bytes::from_static(b"hb")).await.unwrap();
        match rx.next().await.unwrap() {
            Message::Pong(data) => assert_eq!(&data[..], b"hb"),
            other => panic!("expected pong, got {:?}", other),
        }
    }
}
