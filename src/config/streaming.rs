// src/config/streaming.rs
// Pacing and request validation settings for poem streaming

use serde::{Deserialize, Serialize};

use super::helpers::{Lookup, env_or, env_parsed_or};
use crate::error::PoemResult;
use crate::poem::VectorPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Pause after each generated fragment, in milliseconds
    pub pacing_ms: u64,
    pub vector_policy: VectorPolicy,
}

impl StreamingConfig {
    pub fn from_lookup(lookup: Lookup) -> PoemResult<Self> {
        Ok(Self {
            pacing_ms: env_parsed_or(lookup, "POEM_PACING_MS", 50)?,
            vector_policy: env_or(lookup, "POEM_VECTOR_POLICY", "lenient").parse()?,
        })
    }
}
