// src/emotion/mod.rs
// Emotion scores, top-k selection and the classifier interface

mod huggingface;

use std::fmt;

use async_trait::async_trait;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PoemResult;

pub use huggingface::HuggingFaceClassifier;

/// Labels the client's emotion vector is paired with, in wire order
pub const EMOTION_LABELS: [&str; 7] = [
    "joy", "sadness", "neutral", "disgust", "fear", "anger", "surprise",
];

/// Number of labels kept per mapping unless configured otherwise
pub const DEFAULT_TOP_K: usize = 3;

/// A single label/score pair as returned by the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub label: String,
    pub score: f64,
}

impl EmotionScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Ordered label -> score mapping.
///
/// Serializes as a JSON object whose keys appear in descending score order.
/// An empty map (`{}`) marks a blank line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmotionMap(Vec<EmotionScore>);

impl EmotionMap {
    /// Keep the `k` highest scores. Ties keep the classifier's order.
    pub fn top_k(mut scores: Vec<EmotionScore>, k: usize) -> Self {
        scores.sort_by(|a, b| b.score.total_cmp(&a.score));
        scores.truncate(k);
        Self(scores)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|s| s.label == label).map(|s| s.score)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EmotionScore> {
        self.0.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(|s| s.label.as_str()).collect()
    }

    /// Highest scoring label, if any
    pub fn dominant(&self) -> Option<&EmotionScore> {
        self.0.first()
    }
}

impl Serialize for EmotionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for score in &self.0 {
            map.serialize_entry(&score.label, &score.score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EmotionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EmotionMapVisitor;

        impl<'de> Visitor<'de> for EmotionMapVisitor {
            type Value = EmotionMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of emotion label to score")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut scores = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, score)) = access.next_entry::<String, f64>()? {
                    scores.push(EmotionScore { label, score });
                }
                Ok(EmotionMap(scores))
            }
        }

        deserializer.deserialize_map(EmotionMapVisitor)
    }
}

/// Text classifier producing a score for every emotion label it knows
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Model identifier, also quoted in the generation instruction
    fn model(&self) -> &str;

    /// Score `text` against every label. Order of the result is unspecified.
    async fn classify(&self, text: &str) -> PoemResult<Vec<EmotionScore>>;
}
