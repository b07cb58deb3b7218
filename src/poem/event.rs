// src/poem/event.rs
// Outbound per-chunk event and per-request counters

use serde::{Deserialize, Serialize};

use crate::emotion::EmotionMap;

/// One analyzed fragment of the generated poem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkEvent {
    pub poem_chunk: String,
    /// Top emotions of the whole fragment
    pub emotions: EmotionMap,
    /// One entry per `\n`-delimited line, `{}` for blank lines
    pub line_emotions: Vec<EmotionMap>,
}

/// What happened while streaming one request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStats {
    /// Fragments received from the generator
    pub fragments: usize,
    /// Chunk events delivered to the sink
    pub emitted: usize,
    /// Whitespace-only fragments
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::{EmotionMap, EmotionScore};

    #[test]
    fn serializes_with_wire_field_names() {
        let event = ChunkEvent {
            poem_chunk: "Rain\n".to_string(),
            emotions: EmotionMap::top_k(vec![EmotionScore::new("sadness", 0.9)], 3),
            line_emotions: vec![
                EmotionMap::top_k(vec![EmotionScore::new("sadness", 0.9)], 3),
                EmotionMap::default(),
            ],
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["poem_chunk"], "Rain\n");
        assert_eq!(json["emotions"]["sadness"], 0.9);
        assert_eq!(json["line_emotions"][1], serde_json::json!({}));
    }
}
