use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder token left in generated copy and resolved at send time.
pub const CUSTOMER_NAME_PLACEHOLDER: &str = "[Customer Name]";

/// A customer as seen by segment conditions. Every attribute a condition
/// field can address is numeric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: Uuid,
    pub name: String,
    pub purchases: u32,
    pub days_since_last_order: u32,
    pub total_spent: f64,
    pub visit_count: u32,
    pub days_since_join: u32,
}

/// A persisted segment. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub estimated_count: u64,
    pub created_at: DateTime<Utc>,
}

/// A dispatched campaign.
///
/// `sent_count == audience_size` and `delivered_count + failed_count == sent_count`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub segment_id: Uuid,
    pub segment_name: String,
    pub message_template: String,
    pub audience_size: u64,
    pub sent_count: u64,
    pub delivered_count: u64,
    pub failed_count: u64,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    /// Delivered share of sent messages in percent, one decimal.
    pub fn delivery_rate(&self) -> f64 {
        percentage(self.delivered_count, self.sent_count)
    }

    /// Failed share of sent messages in percent, one decimal.
    pub fn failure_rate(&self) -> f64 {
        percentage(self.failed_count, self.sent_count)
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}

/// Campaign category used to pick prompt context and fallback copy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CampaignType {
    WinBack,
    HighValue,
    NewProducts,
    Holiday,
    Seasonal,
    FlashSale,
    Generic,
}

impl CampaignType {
    pub const ALL: [CampaignType; 7] = [
        CampaignType::WinBack,
        CampaignType::HighValue,
        CampaignType::NewProducts,
        CampaignType::Holiday,
        CampaignType::Seasonal,
        CampaignType::FlashSale,
        CampaignType::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignType::WinBack => "win-back",
            CampaignType::HighValue => "high-value",
            CampaignType::NewProducts => "new-products",
            CampaignType::Holiday => "holiday",
            CampaignType::Seasonal => "seasonal",
            CampaignType::FlashSale => "flash-sale",
            CampaignType::Generic => "generic",
        }
    }

    /// Parse a campaign-type tag. Unknown tags fall back to `Generic`.
    pub fn from_tag(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == tag.trim())
            .unwrap_or(CampaignType::Generic)
    }

    /// Infer a campaign type from a segment display name by substring match.
    ///
    /// Segments carry no type of their own, so the name is the only signal.
    pub fn from_segment_name(name: &str) -> Self {
        if name.contains("High-Value") {
            CampaignType::HighValue
        } else if name.contains("Inactive") {
            CampaignType::WinBack
        } else if name.contains("New") {
            CampaignType::NewProducts
        } else {
            CampaignType::Generic
        }
    }
}

impl std::fmt::Display for CampaignType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a set of generated messages came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageSource {
    Generated,
    Fallback,
}

/// Outcome of a message generation request. `success` is always true:
/// upstream failures are replaced with fallback copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationResult {
    pub success: bool,
    pub messages: Vec<String>,
    pub source: MessageSource,
}

/// Signed-in dashboard user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
}

/// Headline numbers for the dashboard overview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStatistics {
    pub customers: u64,
    pub campaigns: u64,
    pub sent_messages: u64,
    pub delivery_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentCampaign {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    pub audience: u64,
    pub delivered: u64,
    pub opened: u64,
}
