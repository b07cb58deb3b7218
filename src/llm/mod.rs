// src/llm/mod.rs
// LLM module exports

pub mod provider;

pub use provider::{GeminiProvider, LlmProvider, TextStream};
