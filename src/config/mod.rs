// src/config/mod.rs
// Central configuration, composed from per-domain configs

pub mod helpers;
pub mod llm;
pub mod server;
pub mod streaming;

use serde::{Deserialize, Serialize};

use crate::error::PoemResult;

pub use helpers::Lookup;
pub use llm::{ClassifierConfig, GeminiConfig};
pub use server::{LoggingConfig, ServerConfig};
pub use streaming::StreamingConfig;

/// Main configuration structure - composes all domain configs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoemConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub gemini: GeminiConfig,
    pub classifier: ClassifierConfig,
    pub streaming: StreamingConfig,
}

impl PoemConfig {
    /// Load from the process environment, reading `.env` first if present
    pub fn from_env() -> PoemResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(&helpers::process_env)
    }

    pub fn from_lookup(lookup: Lookup) -> PoemResult<Self> {
        Ok(Self {
            server: ServerConfig::from_lookup(lookup)?,
            logging: LoggingConfig::from_lookup(lookup),
            gemini: GeminiConfig::from_lookup(lookup)?,
            classifier: ClassifierConfig::from_lookup(lookup)?,
            streaming: StreamingConfig::from_lookup(lookup)?,
        })
    }

    /// Validate config on startup
    pub fn validate(&self) -> PoemResult<()> {
        self.gemini.validate()?;
        self.classifier.validate()?;
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        self.server.bind_address()
    }
}
