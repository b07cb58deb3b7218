// src/state.rs
// Application state - model clients built once at startup and shared read-only

use std::sync::Arc;

use tracing::info;

use crate::api::AllowedOrigins;
use crate::config::PoemConfig;
use crate::emotion::{EmotionClassifier, HuggingFaceClassifier};
use crate::error::PoemResult;
use crate::llm::{GeminiProvider, LlmProvider};
use crate::poem::{OrchestratorSettings, PoemOrchestrator};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<PoemOrchestrator>,
    pub origins: AllowedOrigins,
}

impl AppState {
    /// Construct the Gemini generator and Hugging Face classifier from config
    pub fn new(config: &PoemConfig) -> PoemResult<Self> {
        let generator: Arc<dyn LlmProvider> = Arc::new(GeminiProvider::new(&config.gemini)?);
        let classifier: Arc<dyn EmotionClassifier> =
            Arc::new(HuggingFaceClassifier::new(&config.classifier)?);

        info!(
            "Generator: {} ({}), classifier: {} ({})",
            generator.name(),
            generator.model(),
            classifier.name(),
            classifier.model()
        );

        let orchestrator = PoemOrchestrator::new(
            generator,
            classifier,
            OrchestratorSettings::from_config(config),
        );

        Ok(Self::from_parts(
            orchestrator,
            AllowedOrigins::parse(&config.server.allowed_origins)?,
        ))
    }

    pub fn from_parts(orchestrator: PoemOrchestrator, origins: AllowedOrigins) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            origins,
        }
    }
}
