// src/llm/provider/stream.rs
// SSE framing and stream event types for LLM streaming

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    TextDelta { delta: String },
    Error { message: String },
}

impl StreamEvent {
    /// Interpret one Gemini `data:` payload. Payloads without text
    /// (usage-only trailers, safety metadata) yield `None`; a payload that
    /// is not JSON is an error, never a skipped fragment.
    pub fn from_gemini_data(data: &str) -> Option<Self> {
        let json: Value = match serde_json::from_str(data) {
            Ok(json) => json,
            Err(e) => {
                return Some(StreamEvent::Error {
                    message: format!("malformed stream payload: {}", e),
                });
            }
        };

        if let Some(error) = json.get("error") {
            return Some(StreamEvent::Error {
                message: error["message"]
                    .as_str()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        let parts = json
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())?;

        let mut text = String::new();
        for part in parts {
            if let Some(t) = part.get("text").and_then(|t| t.as_str()) {
                text.push_str(t);
            }
        }

        if text.is_empty() {
            None
        } else {
            Some(StreamEvent::TextDelta { delta: text })
        }
    }
}

/// Reassembles server-sent events from arbitrarily split byte chunks.
///
/// Lines may be cut anywhere, including inside a UTF-8 sequence, so bytes
/// are held until a newline arrives. `data:` lines are joined with `\n`
/// and released when the blank line ending the event is seen.
#[derive(Debug, Default)]
pub struct SseBuffer {
    pending: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every event payload completed by them
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]);
            if let Some(event) = self.process_line(line.trim_end_matches('\r')) {
                events.push(event);
            }
        }
        events
    }

    /// Flush whatever is left once the body has ended
    pub fn finish(&mut self) -> Option<String> {
        if !self.pending.is_empty() {
            let line = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            if let Some(event) = self.process_line(line.trim_end_matches('\r')) {
                return Some(event);
            }
        }
        self.dispatch()
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        if let Some(data) = line.strip_prefix("data:") {
            let data = data.strip_prefix(' ').unwrap_or(data);
            self.data_lines.push(data.to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        if self.data_lines.is_empty() {
            return None;
        }
        let payload = self.data_lines.join("\n");
        self.data_lines.clear();
        Some(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_split_across_chunks_is_reassembled() {
        let mut buffer = SseBuffer::new();
        assert!(buffer.push(b"data: {\"a\":").is_empty());
        assert!(buffer.push(b"1}\r\n").is_empty());
        assert_eq!(buffer.push(b"\r\n"), vec!["{\"a\":1}".to_string()]);
    }

    #[test]
    fn multibyte_character_split_across_chunks() {
        let bytes = "data: café\n\n".as_bytes();
        let split = bytes.iter().position(|&b| b == 0xC3).unwrap() + 1;

        let mut buffer = SseBuffer::new();
        assert!(buffer.push(&bytes[..split]).is_empty());
        assert_eq!(buffer.push(&bytes[split..]), vec!["café".to_string()]);
    }

    #[test]
    fn comments_are_ignored_and_finish_flushes() {
        let mut buffer = SseBuffer::new();
        assert!(buffer.push(b": keep-alive\n\ndata: tail").is_empty());
        assert_eq!(buffer.finish().as_deref(), Some("tail"));
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn several_events_in_one_chunk() {
        let mut buffer = SseBuffer::new();
        let events = buffer.push(b"data: one\n\ndata: two\n\n");
        assert_eq!(events, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn gemini_parts_are_concatenated() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"Rain "},{"text":"falls"}],"role":"model"}}]}"#;
        assert_eq!(
            StreamEvent::from_gemini_data(data),
            Some(StreamEvent::TextDelta {
                delta: "Rain falls".to_string()
            })
        );
    }

    #[test]
    fn gemini_usage_trailer_has_no_text() {
        let data = r#"{"candidates":[{"content":{"parts":[]},"finishReason":"STOP"}],"usageMetadata":{"totalTokenCount":5}}"#;
        assert_eq!(StreamEvent::from_gemini_data(data), None);
    }

    #[test]
    fn gemini_truncated_payload_is_an_error() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"lost line""#;
        match StreamEvent::from_gemini_data(data) {
            Some(StreamEvent::Error { message }) => {
                assert!(message.starts_with("malformed stream payload"))
            }
            other => panic!("expected error event, got {:?}", other),
        }
    }

    #[test]
    fn gemini_error_payload() {
        let data = r#"{"error":{"code":429,"message":"Resource exhausted"}}"#;
        assert_eq!(
            StreamEvent::from_gemini_data(data),
            Some(StreamEvent::Error {
                message: "Resource exhausted".to_string()
            })
        );
    }
}
