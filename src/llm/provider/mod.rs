// src/llm/provider/mod.rs
// LLM Provider trait - streaming text generation behind a provider-agnostic interface

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::PoemResult;

pub mod gemini;
pub mod stream;

pub use gemini::GeminiProvider;
pub use stream::{SseBuffer, StreamEvent};

/// Lazily produced, ordered, finite sequence of generated text fragments
pub type TextStream = Pin<Box<dyn Stream<Item = PoemResult<String>> + Send>>;

/// Universal LLM provider interface
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Model identifier
    fn model(&self) -> &str;

    /// Open a streaming generation for a single user instruction
    async fn stream(&self, instruction: String) -> PoemResult<TextStream>;
}
