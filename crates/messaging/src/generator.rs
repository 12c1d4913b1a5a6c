//! Campaign message generator: best-effort generation with guaranteed
//! fallback copy.

use std::sync::Arc;

use async_trait::async_trait;
use crm_core::types::{CampaignType, GenerationResult, MessageSource};
use tracing::{info, warn};

use crate::error::GenerationError;
use crate::fallback::fallback_messages;
use crate::parser::parse_messages;
use crate::prompt::{build_prompt, segment_objective};

/// External text generation service.
#[async_trait]
pub trait TextGenerationService: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    fn name(&self) -> &'static str;
}

/// Turns an objective and campaign type into candidate messages. Never
/// fails: upstream errors and unusable output switch to fallback copy.
#[derive(Clone)]
pub struct MessageGenerator {
    service: Arc<dyn TextGenerationService>,
}

impl MessageGenerator {
    pub fn new(service: Arc<dyn TextGenerationService>) -> Self {
        Self { service }
    }

    pub async fn generate(&self, objective: &str, campaign_type: CampaignType) -> GenerationResult {
        metrics::counter!(
            "messaging.generation.requests",
            "campaign_type" => campaign_type.as_str()
        )
        .increment(1);

        match self.try_generate(objective, campaign_type).await {
            Ok(messages) => {
                info!(
                    service = self.service.name(),
                    campaign_type = %campaign_type,
                    count = messages.len(),
                    "Campaign messages generated"
                );
                GenerationResult {
                    success: true,
                    messages,
                    source: MessageSource::Generated,
                }
            }
            Err(e) => {
                warn!(
                    service = self.service.name(),
                    campaign_type = %campaign_type,
                    error = %e,
                    "Message generation failed, returning fallback messages"
                );
                metrics::counter!(
                    "messaging.generation.fallback",
                    "campaign_type" => campaign_type.as_str()
                )
                .increment(1);
                GenerationResult {
                    success: true,
                    messages: fallback_messages(campaign_type),
                    source: MessageSource::Fallback,
                }
            }
        }
    }

    /// Same as [`generate`](Self::generate) with a raw campaign-type tag;
    /// unknown tags are treated as generic.
    pub async fn generate_tagged(&self, objective: &str, campaign_type: &str) -> GenerationResult {
        self.generate(objective, CampaignType::from_tag(campaign_type)).await
    }

    /// Suggest copy for a segment, deriving the campaign type from its name.
    pub async fn suggest_for_segment(&self, segment_name: &str) -> GenerationResult {
        let campaign_type = CampaignType::from_segment_name(segment_name);
        self.generate(&segment_objective(segment_name), campaign_type).await
    }

    async fn try_generate(
        &self,
        objective: &str,
        campaign_type: CampaignType,
    ) -> Result<Vec<String>, GenerationError> {
        let prompt = build_prompt(objective, campaign_type);
        let text = self.service.generate(&prompt).await?;
        let messages = parse_messages(&text);
        if messages.is_empty() {
            return Err(GenerationError::NoMessages);
        }
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Replays one canned reply and records the prompt it was given.
    struct StubService {
        reply: Mutex<Option<Result<String, GenerationError>>>,
        last_prompt: Mutex<Option<String>>,
    }

    impl StubService {
        fn new(reply: Result<String, GenerationError>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl TextGenerationService for StubService {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            *self.last_prompt.lock() = Some(prompt.to_string());
            self.reply
                .lock()
                .take()
                .unwrap_or(Err(GenerationError::NoMessages))
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    #[tokio::test]
    async fn test_well_formed_list_is_renumbered() {
        let stub = StubService::new(Ok("1) intro\n4. Hi [Customer Name]\n5. Deals inside\n9. Last call".to_string()));
        let generator = MessageGenerator::new(stub.clone());
        let result = generator.generate("spring promo", CampaignType::Seasonal).await;
        assert!(result.success);
        assert_eq!(result.source, MessageSource::Generated);
        assert_eq!(
            result.messages,
            vec!["1. Hi [Customer Name]", "2. Deals inside", "3. Last call"]
        );
        let prompt = stub.last_prompt.lock().clone().unwrap();
        assert!(prompt.contains("Campaign Type: seasonal"));
    }

    #[tokio::test]
    async fn test_service_error_returns_fallback() {
        let stub = StubService::new(Err(GenerationError::Network("connection refused".to_string())));
        let generator = MessageGenerator::new(stub);
        let result = generator.generate_tagged("win-back offer", "win-back").await;
        assert!(result.success);
        assert_eq!(result.source, MessageSource::Fallback);
        assert_eq!(result.messages, fallback_messages(CampaignType::WinBack));
        assert_eq!(result.messages.len(), 5);
    }

    #[tokio::test]
    async fn test_blank_reply_returns_fallback() {
        let stub = StubService::new(Ok("   ".to_string()));
        let generator = MessageGenerator::new(stub);
        let result = generator.generate("", CampaignType::Generic).await;
        assert!(result.success);
        assert_eq!(result.source, MessageSource::Fallback);
        assert_eq!(result.messages, fallback_messages(CampaignType::Generic));
    }

    #[tokio::test]
    async fn test_empty_objective_still_generates() {
        let stub = StubService::new(Ok("1. A\n2. B\n3. C\n4. D\n5. E".to_string()));
        let generator = MessageGenerator::new(stub.clone());
        let result = generator.generate("", CampaignType::Holiday).await;
        assert_eq!(result.source, MessageSource::Generated);
        assert_eq!(result.messages.len(), 4);
        assert!(stub.last_prompt.lock().as_deref().unwrap().contains("User Prompt: \n"));
    }

    #[tokio::test]
    async fn test_suggest_for_segment_derives_type() {
        let stub = StubService::new(Err(GenerationError::MissingApiKey));
        let generator = MessageGenerator::new(stub.clone());
        let result = generator.suggest_for_segment("Inactive Users").await;
        assert_eq!(result.messages, fallback_messages(CampaignType::WinBack));
        let prompt = stub.last_prompt.lock().clone().unwrap();
        assert!(prompt.contains("User Prompt: Generate a message for Inactive Users"));
    }
}
