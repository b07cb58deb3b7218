// src/llm/provider/gemini.rs
// Gemini provider using the Google AI streamGenerateContent endpoint

use std::time::Duration;

use async_stream::try_stream;
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Client;
use tracing::debug;

use super::stream::{SseBuffer, StreamEvent};
use super::{LlmProvider, TextStream};
use crate::config::GeminiConfig;
use crate::error::{PoemError, PoemResult};

/// Gemini provider using Google AI API
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    pub fn new(config: &GeminiConfig) -> PoemResult<Self> {
        if config.api_key.is_empty() {
            return Err(PoemError::config("Google API key is required"));
        }

        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        Ok(GeminiProvider {
            client: builder.build()?,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Build the streaming API URL
    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn request_body(&self, instruction: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": instruction}]
            }],
            "generationConfig": {
                "temperature": self.temperature
            }
        })
    }
}

/// Turn an SSE byte stream into text fragments, one per `data:` event
pub fn sse_text_stream<S>(bytes: S) -> impl Stream<Item = PoemResult<String>> + Send
where
    S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
{
    try_stream! {
        let mut buffer = SseBuffer::new();
        futures::pin_mut!(bytes);

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(|e| PoemError::generation(format!("Stream error: {}", e)))?;
            for payload in buffer.push(&chunk) {
                if let Some(text) = payload_text(&payload)? {
                    yield text;
                }
            }
        }

        if let Some(payload) = buffer.finish() {
            if let Some(text) = payload_text(&payload)? {
                yield text;
            }
        }
    }
}

fn payload_text(payload: &str) -> PoemResult<Option<String>> {
    match StreamEvent::from_gemini_data(payload) {
        Some(StreamEvent::TextDelta { delta }) => Ok(Some(delta)),
        Some(StreamEvent::Error { message }) => Err(PoemError::generation(message)),
        None => Ok(None),
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn stream(&self, instruction: String) -> PoemResult<TextStream> {
        debug!(
            "Sending streaming request to {} ({} chars)",
            self.model,
            instruction.len()
        );

        let response = self
            .client
            .post(self.stream_url())
            .header("Content-Type", "application/json")
            .json(&self.request_body(&instruction))
            .send()
            .await
            .map_err(|e| PoemError::generation(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PoemError::generation(format!(
                "Gemini API returned {}: {}",
                status, error_text
            )));
        }

        Ok(Box::pin(sse_text_stream(response.bytes_stream())))
    }
}
