// tests/common/mod.rs
// Shared test doubles and server helpers

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use futures::stream;

use poem_stream::AppState;
use poem_stream::api::{AllowedOrigins, create_router};
use poem_stream::emotion::{EMOTION_LABELS, EmotionClassifier, EmotionScore};
use poem_stream::error::{PoemError, PoemResult};
use poem_stream::llm::{LlmProvider, TextStream};
use poem_stream::poem::{OrchestratorSettings, PoemOrchestrator, VectorPolicy};

/// Generator that replays a fixed list of fragments and records instructions
pub struct ScriptedGenerator {
    fragments: Vec<String>,
    pub instructions: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            instructions: Mutex::new(Vec::new()),
        }
    }

    pub fn last_instruction(&self) -> Option<String> {
        self.instructions.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmProvider for ScriptedGenerator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-v1"
    }

    async fn stream(&self, instruction: String) -> PoemResult<TextStream> {
        self.instructions.lock().unwrap().push(instruction);
        let items: Vec<PoemResult<String>> = self.fragments.iter().cloned().map(Ok).collect();
        Ok(Box::pin(stream::iter(items)))
    }
}

/// Generator whose stream request always fails
pub struct FailingGenerator;

#[async_trait]
impl LlmProvider for FailingGenerator {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn model(&self) -> &str {
        "failing-v1"
    }

    async fn stream(&self, _instruction: String) -> PoemResult<TextStream> {
        Err(PoemError::generation("quota exhausted"))
    }
}

/// Classifier that scores text by keyword, all seven labels every call
pub struct KeywordClassifier {
    pub calls: Mutex<Vec<String>>,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EmotionClassifier for KeywordClassifier {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn model(&self) -> &str {
        "keyword-emotions"
    }

    async fn classify(&self, text: &str) -> PoemResult<Vec<EmotionScore>> {
        self.calls.lock().unwrap().push(text.to_string());

        let lowered = text.to_lowercase();
        let boosted = if lowered.contains("rain") {
            "sadness"
        } else if lowered.contains("light") {
            "joy"
        } else {
            "neutral"
        };

        Ok(EMOTION_LABELS
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let score = if *label == boosted {
                    0.7
                } else {
                    0.05 - i as f64 * 0.005
                };
                EmotionScore::new(*label, score)
            })
            .collect())
    }
}

pub fn settings(policy: VectorPolicy) -> OrchestratorSettings {
    OrchestratorSettings {
        pacing: Duration::ZERO,
        top_k: 3,
        vector_policy: policy,
    }
}

/// Orchestrator with default settings, pacing disabled
pub fn orchestrator(
    generator: Arc<dyn LlmProvider>,
    classifier: Arc<dyn EmotionClassifier>,
) -> PoemOrchestrator {
    PoemOrchestrator::new(
        generator,
        classifier,
        OrchestratorSettings {
            pacing: Duration::ZERO,
            ..Default::default()
        },
    )
}

pub fn app_state(
    generator: Arc<dyn LlmProvider>,
    classifier: Arc<dyn EmotionClassifier>,
    origins: &[&str],
) -> Arc<AppState> {
    app_state_with_policy(generator, classifier, origins, VectorPolicy::default())
}

pub fn app_state_with_policy(
    generator: Arc<dyn LlmProvider>,
    classifier: Arc<dyn EmotionClassifier>,
    origins: &[&str],
    policy: VectorPolicy,
) -> Arc<AppState> {
    let patterns: Vec<String> = origins.iter().map(|o| o.to_string()).collect();
    Arc::new(AppState::from_parts(
        PoemOrchestrator::new(generator, classifier, settings(policy)),
        AllowedOrigins::parse(&patterns).unwrap(),
    ))
}

/// Serve the application router on an ephemeral port
pub async fn spawn_app(state: Arc<AppState>) -> SocketAddr {
    spawn_router_with_connect_info(create_router(state)).await
}

pub async fn spawn_router_with_connect_info(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    addr
}

/// Serve a plain router (mock upstream APIs)
pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}
