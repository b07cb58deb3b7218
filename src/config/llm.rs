// src/config/llm.rs
// Generator (Gemini) and emotion classifier configuration

use serde::{Deserialize, Serialize};

use super::helpers::{Lookup, env_first, env_or, env_parsed_or};
use crate::emotion::DEFAULT_TOP_K;
use crate::error::{PoemError, PoemResult};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_EMOTION_MODEL: &str = "j-hartmann/emotion-english-distilroberta-base";
pub const DEFAULT_EMOTION_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Gemini streaming generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(skip_serializing, default)]
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    /// Outbound request timeout in seconds, 0 disables it
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn from_lookup(lookup: Lookup) -> PoemResult<Self> {
        Ok(Self {
            api_key: env_first(lookup, &["GEMINI_API_KEY", "GOOGLE_API_KEY"]).unwrap_or_default(),
            model: env_or(lookup, "GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            base_url: env_or(lookup, "GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            temperature: env_parsed_or(lookup, "GEMINI_TEMPERATURE", 1.0)?,
            timeout_secs: env_parsed_or(lookup, "POEM_HTTP_TIMEOUT_SECS", 0)?,
        })
    }

    pub fn validate(&self) -> PoemResult<()> {
        if self.api_key.is_empty() {
            return Err(PoemError::config(
                "GEMINI_API_KEY (or GOOGLE_API_KEY) is required",
            ));
        }
        Ok(())
    }
}

/// Hugging Face text-classification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(skip_serializing, default)]
    pub api_token: Option<String>,
    pub model: String,
    pub base_url: String,
    pub top_k: usize,
    pub timeout_secs: u64,
}

impl ClassifierConfig {
    pub fn from_lookup(lookup: Lookup) -> PoemResult<Self> {
        Ok(Self {
            api_token: env_first(lookup, &["HF_API_TOKEN", "HUGGINGFACE_API_TOKEN"]),
            model: env_or(lookup, "EMOTION_MODEL", DEFAULT_EMOTION_MODEL),
            base_url: env_or(lookup, "EMOTION_BASE_URL", DEFAULT_EMOTION_BASE_URL),
            top_k: env_parsed_or(lookup, "EMOTION_TOP_K", DEFAULT_TOP_K)?,
            timeout_secs: env_parsed_or(lookup, "POEM_HTTP_TIMEOUT_SECS", 0)?,
        })
    }

    pub fn validate(&self) -> PoemResult<()> {
        if self.top_k == 0 {
            return Err(PoemError::config("EMOTION_TOP_K must be at least 1"));
        }
        Ok(())
    }
}
