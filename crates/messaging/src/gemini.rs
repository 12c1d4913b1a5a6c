//! Gemini `generateContent` client.
//!
//! Sends a single-turn prompt and returns the text of the first candidate.

use std::time::Duration;

use async_trait::async_trait;
use crm_core::config::GeminiConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GenerationError;
use crate::generator::TextGenerationService;

#[derive(Debug, Serialize, Deserialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

pub struct GeminiClient {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key: config
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
            client,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl TextGenerationService for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "Calling Gemini");

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        parsed.into_text().ok_or_else(|| {
            GenerationError::MalformedResponse("missing candidates[0].content.parts[0].text".to_string())
        })
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some("hello".to_string()),
                }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn test_response_text_extraction() {
        let ok: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "1. Hi"}], "role": "model"}}]
        }))
        .unwrap();
        assert_eq!(ok.into_text().as_deref(), Some("1. Hi"));

        let empty: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"promptFeedback": {}})).unwrap();
        assert_eq!(empty.into_text(), None);

        let no_parts: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"candidates": [{"finishReason": "SAFETY"}]}))
                .unwrap();
        assert_eq!(no_parts.into_text(), None);
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = GeminiClient::new(&GeminiConfig {
            api_key: Some("  ".to_string()),
            ..GeminiConfig::default()
        })
        .unwrap();
        assert!(!client.has_api_key());
        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey));
    }
}
