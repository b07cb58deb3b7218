// src/poem/orchestrator.rs
// Drives one poem request: generate, classify each fragment and line, emit, pace

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::event::{ChunkEvent, StreamStats};
use super::prompt::build_instruction;
use super::request::{PoemRequest, VectorPolicy};
use crate::config::PoemConfig;
use crate::emotion::{DEFAULT_TOP_K, EmotionClassifier, EmotionMap};
use crate::error::PoemResult;
use crate::llm::LlmProvider;

/// Tunables for the orchestration loop
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Pause after every fragment, blank or not
    pub pacing: Duration,
    /// Labels kept per emotion mapping
    pub top_k: usize,
    pub vector_policy: VectorPolicy,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(50),
            top_k: DEFAULT_TOP_K,
            vector_policy: VectorPolicy::Lenient,
        }
    }
}

impl OrchestratorSettings {
    pub fn from_config(config: &PoemConfig) -> Self {
        Self {
            pacing: Duration::from_millis(config.streaming.pacing_ms),
            top_k: config.classifier.top_k,
            vector_policy: config.streaming.vector_policy,
        }
    }
}

/// Transport-independent poem handler.
///
/// Holds the generator and classifier for the lifetime of the process;
/// every request gets its own instruction, stream and counters.
pub struct PoemOrchestrator {
    generator: Arc<dyn LlmProvider>,
    classifier: Arc<dyn EmotionClassifier>,
    settings: OrchestratorSettings,
}

impl PoemOrchestrator {
    pub fn new(
        generator: Arc<dyn LlmProvider>,
        classifier: Arc<dyn EmotionClassifier>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            generator,
            classifier,
            settings,
        }
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    pub fn generator(&self) -> &dyn LlmProvider {
        self.generator.as_ref()
    }

    pub fn classifier(&self) -> &dyn EmotionClassifier {
        self.classifier.as_ref()
    }

    /// Stream a poem for `request`, sending one `ChunkEvent` per non-blank
    /// fragment to `sink`.
    ///
    /// Returns when the generator finishes or the sink is closed. Any
    /// generator or classifier failure ends the request with that error;
    /// events already sent stay sent.
    pub async fn handle(
        &self,
        request: PoemRequest,
        sink: mpsc::Sender<ChunkEvent>,
    ) -> PoemResult<StreamStats> {
        request.validate(self.settings.vector_policy)?;

        let instruction = build_instruction(&request, self.classifier.model());
        info!(
            "Streaming poem from {} ({}) for prompt of {} chars",
            self.generator.name(),
            self.generator.model(),
            request.prompt.len()
        );
        debug!("Instruction: {}", instruction);

        let mut fragments = self.generator.stream(instruction).await?;
        let mut stats = StreamStats::default();

        while let Some(fragment) = fragments.next().await {
            let fragment = fragment?;
            stats.fragments += 1;

            match self.analyze_fragment(&fragment).await? {
                Some(event) => {
                    if sink.send(event).await.is_err() {
                        warn!("Event sink closed, abandoning stream after {} fragments", stats.fragments);
                        return Ok(stats);
                    }
                    stats.emitted += 1;
                }
                None => {
                    debug!("Skipping blank fragment");
                    stats.skipped += 1;
                }
            }

            if !self.settings.pacing.is_zero() {
                tokio::time::sleep(self.settings.pacing).await;
            }
        }

        info!(
            "Poem stream finished: {} fragments, {} emitted, {} blank",
            stats.fragments, stats.emitted, stats.skipped
        );
        Ok(stats)
    }

    /// Classify a fragment and each of its lines.
    ///
    /// Whitespace-only fragments yield `None`. Blank lines get an empty
    /// mapping so `line_emotions` lines up with `fragment.split('\n')`.
    pub async fn analyze_fragment(&self, fragment: &str) -> PoemResult<Option<ChunkEvent>> {
        if fragment.trim().is_empty() {
            return Ok(None);
        }

        let emotions = self.top_emotions(fragment).await?;

        let mut line_emotions = Vec::new();
        for line in fragment.split('\n') {
            if line.trim().is_empty() {
                line_emotions.push(EmotionMap::default());
            } else {
                line_emotions.push(self.top_emotions(line).await?);
            }
        }

        Ok(Some(ChunkEvent {
            poem_chunk: fragment.to_string(),
            emotions,
            line_emotions,
        }))
    }

    async fn top_emotions(&self, text: &str) -> PoemResult<EmotionMap> {
        let scores = self.classifier.classify(text).await?;
        Ok(EmotionMap::top_k(scores, self.settings.top_k))
    }
}
