//! API request/response types for the dashboard backend.

use chrono::{DateTime, Utc};
use crm_core::types::{Campaign, CampaignType, GenerationResult, UserProfile};
use crm_segmentation::SegmentDefinition;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Auth ──────────────────────────────────────────────────────────────────

/// Identity as reported by the external identity provider after its
/// popup/redirect flow.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityAssertion {
    pub uid: String,
    #[serde(rename = "displayName", alias = "display_name", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "photoURL", alias = "photo_url", default)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignInResponse {
    pub token: String,
    pub user: UserProfile,
    pub expires_at: DateTime<Utc>,
}

// ─── Segments ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewSegmentResponse {
    pub audience_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreateSegmentRequest {
    #[serde(flatten)]
    pub definition: SegmentDefinition,
    /// Count from an earlier preview of the same draft, reused as the
    /// segment's estimate.
    #[serde(default)]
    pub preview_count: Option<u64>,
}

// ─── Campaigns ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub segment_id: Option<Uuid>,
    #[serde(default)]
    pub message: String,
}

/// Campaign as shown in the history view, with delivery percentages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignView {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub delivery_rate: f64,
    pub failure_rate: f64,
}

impl From<Campaign> for CampaignView {
    fn from(campaign: Campaign) -> Self {
        Self {
            delivery_rate: campaign.delivery_rate(),
            failure_rate: campaign.failure_rate(),
            campaign,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCampaignResponse {
    #[serde(flatten)]
    pub campaign: CampaignView,
    /// The template rendered for the signed-in user.
    pub preview: String,
}

// ─── Message generation ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateMessagesRequest {
    #[serde(default)]
    pub objective: String,
    #[serde(default = "default_campaign_type")]
    pub campaign_type: String,
}

fn default_campaign_type() -> String {
    CampaignType::Generic.as_str().to_string()
}

#[derive(Debug, Deserialize)]
pub struct SuggestMessageRequest {
    #[serde(default)]
    pub segment_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestMessageResponse {
    pub campaign_type: CampaignType,
    /// First suggestion, pre-selected for the message field.
    pub selected: String,
    #[serde(flatten)]
    pub result: GenerationResult,
}

// ─── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
