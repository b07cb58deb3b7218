// src/api/ws/message.rs
// Defines the data structures for WebSocket client and server messages.
//
// Every frame is `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::poem::{ChunkEvent, PoemRequest, StreamStats};

/// Represents all possible messages sent from the client to the server.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum WsClientMessage {
    /// Ask for a poem reflecting the given emotions
    SendPrompt(PoemRequest),
}

/// Represents all possible messages sent from the server to the client.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum WsServerMessage {
    /// Signals that the server is connected and ready
    ConnectionReady { version: String },

    /// One analyzed poem fragment
    ReceivePoemStream(ChunkEvent),

    /// The generator finished for the current prompt
    PoemComplete { fragments: usize, emitted: usize },

    /// The current prompt failed; the connection stays open
    PoemError { message: String, code: String },
}

impl WsServerMessage {
    pub fn complete(stats: &StreamStats) -> Self {
        WsServerMessage::PoemComplete {
            fragments: stats.fragments,
            emitted: stats.emitted,
        }
    }
}
