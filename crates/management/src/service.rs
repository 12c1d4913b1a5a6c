//! Dashboard operations: segment preview/create, campaign create, and
//! message suggestions. Validation happens before any simulated latency or
//! external call.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use crm_core::types::{Campaign, CampaignType, GenerationResult, Segment};
use crm_core::{CrmError, CrmResult};
use crm_messaging::MessageGenerator;
use crm_segmentation::{SegmentDefinition, SegmentDraft, SegmentationEngine};
use tracing::info;
use uuid::Uuid;

use crate::dispatch::DeliverySimulator;
use crate::models::CreateCampaignRequest;
use crate::store::CrmRepository;

pub struct CrmService {
    store: Arc<dyn CrmRepository>,
    engine: Arc<SegmentationEngine>,
    generator: MessageGenerator,
    dispatcher: DeliverySimulator,
    latency: Duration,
}

impl CrmService {
    pub fn new(
        store: Arc<dyn CrmRepository>,
        engine: Arc<SegmentationEngine>,
        generator: MessageGenerator,
        dispatcher: DeliverySimulator,
    ) -> Self {
        Self {
            store,
            engine,
            generator,
            dispatcher,
            latency: Duration::ZERO,
        }
    }

    /// Delay applied before mocked reads and writes.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn store(&self) -> &Arc<dyn CrmRepository> {
        &self.store
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    pub async fn list_segments(&self) -> Vec<Segment> {
        self.simulate_latency().await;
        self.store.list_segments()
    }

    pub async fn list_campaigns(&self) -> Vec<Campaign> {
        self.simulate_latency().await;
        self.store.list_campaigns()
    }

    /// Estimate the audience of a definition without storing anything.
    pub async fn preview_segment(&self, definition: &SegmentDefinition) -> CrmResult<u64> {
        definition.validate()?;
        self.simulate_latency().await;
        self.engine.evaluate(definition)
    }

    /// Validate, size and store a submitted draft. The draft's preview count
    /// is reused when the estimator could have produced it; a missing or
    /// zero count gets a fresh estimate.
    pub async fn create_segment(&self, draft: &SegmentDraft) -> CrmResult<Segment> {
        let definition = draft.definition();
        definition.validate()?;
        self.simulate_latency().await;

        let estimated_count = draft.audience_for_create(&self.engine)?;

        let segment = self.store.create_segment(Segment {
            id: Uuid::new_v4(),
            name: definition.name,
            description: definition.description,
            estimated_count,
            created_at: Utc::now(),
        });

        metrics::counter!("management.segments.created").increment(1);
        info!(
            segment_id = %segment.id,
            name = %segment.name,
            estimated_count,
            "Segment created"
        );
        Ok(segment)
    }

    /// Validate and dispatch a campaign to its segment's audience.
    pub async fn create_campaign(&self, req: &CreateCampaignRequest) -> CrmResult<Campaign> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(CrmError::validation("Please enter a campaign name."));
        }
        let segment_id = req
            .segment_id
            .ok_or_else(|| CrmError::validation("Please select a segment."))?;
        if req.message.trim().is_empty() {
            return Err(CrmError::validation("Please enter a message."));
        }

        self.simulate_latency().await;

        let segment = self
            .store
            .get_segment(segment_id)
            .ok_or_else(|| CrmError::NotFound(format!("segment {segment_id}")))?;

        let report = self.dispatcher.dispatch(segment.estimated_count);
        let campaign = self.store.create_campaign(Campaign {
            id: Uuid::new_v4(),
            name: name.to_string(),
            segment_id: segment.id,
            segment_name: segment.name.clone(),
            message_template: req.message.trim().to_string(),
            audience_size: segment.estimated_count,
            sent_count: report.sent,
            delivered_count: report.delivered,
            failed_count: report.failed,
            created_at: Utc::now(),
        });

        metrics::counter!("management.campaigns.created").increment(1);
        metrics::counter!("management.messages.sent").increment(report.sent);
        info!(
            campaign_id = %campaign.id,
            segment = %campaign.segment_name,
            sent = report.sent,
            delivered = report.delivered,
            failed = report.failed,
            "Campaign dispatched"
        );
        Ok(campaign)
    }

    /// Generate copy for a free-text objective and campaign-type tag.
    pub async fn generate_messages(&self, objective: &str, campaign_type: &str) -> GenerationResult {
        self.generator.generate_tagged(objective, campaign_type).await
    }

    /// Generate copy for an existing segment.
    pub async fn suggest_message(
        &self,
        segment_id: Option<Uuid>,
    ) -> CrmResult<(CampaignType, GenerationResult)> {
        let segment_id = segment_id.ok_or_else(|| CrmError::validation("Please select a segment first."))?;
        let segment = self
            .store
            .get_segment(segment_id)
            .ok_or_else(|| CrmError::NotFound(format!("segment {segment_id}")))?;
        let campaign_type = CampaignType::from_segment_name(&segment.name);
        let result = self.generator.suggest_for_segment(&segment.name).await;
        Ok((campaign_type, result))
    }
}
