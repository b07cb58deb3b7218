// src/emotion/huggingface.rs
// Emotion classifier backed by the Hugging Face Inference API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EmotionClassifier, EmotionScore};
use crate::config::ClassifierConfig;
use crate::error::{PoemError, PoemResult};

/// Text-classification client returning a score for every label
#[derive(Clone)]
pub struct HuggingFaceClassifier {
    client: Client,
    api_token: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ClassificationRequest<'a> {
    inputs: &'a str,
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

/// The API answers `[[{label, score}, ...]]` for a single input, some
/// deployments flatten it to `[{label, score}, ...]`
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<EmotionScore>>),
    Flat(Vec<EmotionScore>),
    Error { error: String },
}

impl HuggingFaceClassifier {
    pub fn new(config: &ClassifierConfig) -> PoemResult<Self> {
        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        Ok(Self {
            client: builder.build()?,
            api_token: config.api_token.clone().filter(|t| !t.is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn api_url(&self) -> String {
        format!("{}/{}", self.base_url, self.model)
    }
}

#[async_trait]
impl EmotionClassifier for HuggingFaceClassifier {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn classify(&self, text: &str) -> PoemResult<Vec<EmotionScore>> {
        debug!("Classifying {} chars with {}", text.len(), self.model);

        let mut request = self
            .client
            .post(self.api_url())
            .header("Content-Type", "application/json")
            .json(&ClassificationRequest {
                inputs: text,
                options: RequestOptions {
                    wait_for_model: true,
                },
            });

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PoemError::classification(format!("Hugging Face request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PoemError::classification(format!(
                "Hugging Face API returned {}: {}",
                status, error_text
            )));
        }

        let parsed = response
            .json::<ClassificationResponse>()
            .await
            .map_err(|e| PoemError::classification(format!("unreadable classification: {}", e)))?;

        match parsed {
            ClassificationResponse::Nested(mut batches) => {
                if batches.is_empty() {
                    return Err(PoemError::classification("empty classification result"));
                }
                Ok(batches.swap_remove(0))
            }
            ClassificationResponse::Flat(scores) => Ok(scores),
            ClassificationResponse::Error { error } => Err(PoemError::classification(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_and_flat_shapes() {
        let nested: ClassificationResponse =
            serde_json::from_str(r#"[[{"label":"joy","score":0.9},{"label":"fear","score":0.1}]]"#)
                .unwrap();
        assert!(matches!(nested, ClassificationResponse::Nested(ref b) if b[0].len() == 2));

        let flat: ClassificationResponse =
            serde_json::from_str(r#"[{"label":"joy","score":0.9}]"#).unwrap();
        assert!(matches!(flat, ClassificationResponse::Flat(ref s) if s.len() == 1));
    }

    #[test]
    fn parses_error_payload() {
        let err: ClassificationResponse =
            serde_json::from_str(r#"{"error":"Model is loading"}"#).unwrap();
        assert!(matches!(err, ClassificationResponse::Error { ref error } if error == "Model is loading"));
    }

    #[test]
    fn url_joins_base_and_model() {
        let classifier = HuggingFaceClassifier::new(&ClassifierConfig {
            api_token: Some(String::new()),
            model: "org/model".to_string(),
            base_url: "http://localhost:9000/models/".to_string(),
            top_k: 3,
            timeout_secs: 0,
        })
        .unwrap();
        assert_eq!(classifier.api_url(), "http://localhost:9000/models/org/model");
        assert!(classifier.api_token.is_none());
    }

    #[tokio::test]
    async fn unreachable_api_is_a_classification_failure() {
        let classifier = HuggingFaceClassifier::new(&ClassifierConfig {
            api_token: None,
            model: "org/model".to_string(),
            base_url: "http://127.0.0.1:1/models".to_string(),
            top_k: 3,
            timeout_secs: 5,
        })
        .unwrap();

        let err = classifier.classify("Rain falls soft").await.unwrap_err();
        assert_eq!(err.code(), "classification_failed");
    }
}
