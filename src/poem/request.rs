// src/poem/request.rs
// Inbound poem request and emotion-vector handling

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::emotion::EMOTION_LABELS;
use crate::error::{PoemError, PoemResult};

/// How strictly the emotion vector is checked against the label list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorPolicy {
    /// Exactly one finite score per label
    Strict,
    /// Pair positionally and silently drop whatever does not line up
    #[default]
    Lenient,
}

impl FromStr for VectorPolicy {
    type Err = PoemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(VectorPolicy::Strict),
            "lenient" => Ok(VectorPolicy::Lenient),
            other => Err(PoemError::config(format!(
                "unknown vector policy '{}', expected 'strict' or 'lenient'",
                other
            ))),
        }
    }
}

/// Payload of a `send_prompt` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoemRequest {
    pub prompt: String,
    #[serde(rename = "emotionVector")]
    pub emotion_vector: Vec<f64>,
}

impl PoemRequest {
    pub fn new(prompt: impl Into<String>, emotion_vector: Vec<f64>) -> Self {
        Self {
            prompt: prompt.into(),
            emotion_vector,
        }
    }

    /// Scores paired with their labels, truncated to the shorter of the two
    pub fn labeled_emotions(&self) -> Vec<(&'static str, f64)> {
        EMOTION_LABELS
            .iter()
            .copied()
            .zip(self.emotion_vector.iter().copied())
            .collect()
    }

    pub fn validate(&self, policy: VectorPolicy) -> PoemResult<()> {
        if policy == VectorPolicy::Lenient {
            return Ok(());
        }

        if self.emotion_vector.len() != EMOTION_LABELS.len() {
            return Err(PoemError::invalid_request(format!(
                "emotionVector must have {} scores ({}), got {}",
                EMOTION_LABELS.len(),
                EMOTION_LABELS.join(", "),
                self.emotion_vector.len()
            )));
        }

        if let Some(pos) = self.emotion_vector.iter().position(|s| !s.is_finite()) {
            return Err(PoemError::invalid_request(format!(
                "emotionVector score for '{}' is not a finite number",
                EMOTION_LABELS[pos]
            )));
        }

        Ok(())
    }
}
