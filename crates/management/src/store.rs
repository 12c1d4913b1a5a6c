//! In-memory CRM store.
//!
//! Holds the session's segments, campaigns and demo customers. Lists are
//! kept newest-first; everything is lost on restart or sign-out.

use chrono::{DateTime, NaiveDate, Utc};
use crm_core::types::{Campaign, CustomerRecord, DashboardStatistics, RecentCampaign, Segment};
use crm_segmentation::CustomerSource;
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use uuid::Uuid;

/// Number of demo customers, matching the dashboard's customer statistic.
const DEMO_CUSTOMERS: usize = 1284;
const DEMO_CUSTOMER_SEED: u64 = 0x5EED_C0DE;

/// Segment and campaign storage used by the dashboard.
pub trait CrmRepository: Send + Sync {
    fn list_segments(&self) -> Vec<Segment>;
    fn get_segment(&self, id: Uuid) -> Option<Segment>;
    /// Store a segment at the front of the list.
    fn create_segment(&self, segment: Segment) -> Segment;
    fn list_campaigns(&self) -> Vec<Campaign>;
    /// Store a campaign at the front of the list.
    fn create_campaign(&self, campaign: Campaign) -> Campaign;
    fn dashboard_statistics(&self) -> DashboardStatistics;
    fn recent_campaigns(&self) -> Vec<RecentCampaign>;
    /// Drop everything created this session and restore the seeded state.
    fn reset(&self);
}

/// Thread-safe in-memory store.
pub struct InMemoryStore {
    segments: RwLock<Vec<Segment>>,
    campaigns: RwLock<Vec<Campaign>>,
    customers: Vec<CustomerRecord>,
    seed_demo_data: bool,
}

impl InMemoryStore {
    pub fn new(seed_demo_data: bool) -> Self {
        let store = Self {
            segments: RwLock::new(Vec::new()),
            campaigns: RwLock::new(Vec::new()),
            customers: if seed_demo_data { demo_customers() } else { Vec::new() },
            seed_demo_data,
        };
        store.seed();
        info!(
            seeded = seed_demo_data,
            customers = store.customers.len(),
            "CRM store initialized (in-memory)"
        );
        store
    }

    fn seed(&self) {
        let mut segments = self.segments.write();
        let mut campaigns = self.campaigns.write();
        segments.clear();
        campaigns.clear();
        if !self.seed_demo_data {
            return;
        }

        let high_value = demo_segment("High-Value Customers", "Customers who spent over ₹10,000", 145);
        let inactive = demo_segment("Inactive Users", "No activity in the last 90 days", 328);
        let new_customers = demo_segment("New Customers", "Joined in the last 30 days", 72);

        campaigns.push(demo_campaign("Summer Sale Promotion", &high_value, 138, 7, seed_date(2025, 5, 1)));
        campaigns.push(demo_campaign("Win-back Promotion", &inactive, 301, 27, seed_date(2025, 4, 20)));
        campaigns.push(demo_campaign("Welcome Discount", &new_customers, 70, 2, seed_date(2025, 4, 10)));

        segments.push(high_value);
        segments.push(inactive);
        segments.push(new_customers);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CrmRepository for InMemoryStore {
    fn list_segments(&self) -> Vec<Segment> {
        self.segments.read().clone()
    }

    fn get_segment(&self, id: Uuid) -> Option<Segment> {
        self.segments.read().iter().find(|s| s.id == id).cloned()
    }

    fn create_segment(&self, segment: Segment) -> Segment {
        self.segments.write().insert(0, segment.clone());
        segment
    }

    fn list_campaigns(&self) -> Vec<Campaign> {
        self.campaigns.read().clone()
    }

    fn create_campaign(&self, campaign: Campaign) -> Campaign {
        self.campaigns.write().insert(0, campaign.clone());
        campaign
    }

    fn dashboard_statistics(&self) -> DashboardStatistics {
        DashboardStatistics {
            customers: 1284,
            campaigns: 23,
            sent_messages: 18472,
            delivery_rate: 94.0,
        }
    }

    fn recent_campaigns(&self) -> Vec<RecentCampaign> {
        vec![
            recent("1", "Summer Sale Promotion", (2025, 5, 1), 543, 512, 325),
            recent("2", "New Collection Announcement", (2025, 4, 20), 789, 750, 412),
            recent("3", "Customer Feedback Request", (2025, 4, 10), 1021, 945, 520),
        ]
    }

    fn reset(&self) {
        self.seed();
        info!("CRM store reset to seeded state");
    }
}

impl CustomerSource for InMemoryStore {
    fn customers(&self) -> Vec<CustomerRecord> {
        self.customers.clone()
    }
}

fn demo_segment(name: &str, description: &str, count: u64) -> Segment {
    Segment {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: description.to_string(),
        estimated_count: count,
        created_at: Utc::now(),
    }
}

fn demo_campaign(
    name: &str,
    segment: &Segment,
    delivered: u64,
    failed: u64,
    created_at: DateTime<Utc>,
) -> Campaign {
    Campaign {
        id: Uuid::new_v4(),
        name: name.to_string(),
        segment_id: segment.id,
        segment_name: segment.name.clone(),
        message_template: "Hello [Customer Name], thank you for being with us!".to_string(),
        audience_size: segment.estimated_count,
        sent_count: segment.estimated_count,
        delivered_count: delivered,
        failed_count: failed,
        created_at,
    }
}

fn recent(
    id: &str,
    name: &str,
    (y, m, d): (i32, u32, u32),
    audience: u64,
    delivered: u64,
    opened: u64,
) -> RecentCampaign {
    RecentCampaign {
        id: id.to_string(),
        name: name.to_string(),
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        audience,
        delivered,
        opened,
    }
}

fn seed_date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_else(Utc::now)
}

/// Deterministic demo customers for predicate-based estimation.
fn demo_customers() -> Vec<CustomerRecord> {
    const FIRST_NAMES: [&str; 8] = ["Aarav", "Diya", "Kabir", "Meera", "Rohan", "Ananya", "Vikram", "Isha"];
    let mut rng = StdRng::seed_from_u64(DEMO_CUSTOMER_SEED);
    (0..DEMO_CUSTOMERS)
        .map(|i| {
            let purchases: u32 = rng.gen_range(0..=40);
            let days_since_last_order: u32 = rng.gen_range(0..=365);
            let average_order: f64 = rng.gen_range(200.0..1500.0);
            CustomerRecord {
                id: Uuid::from_u128(i as u128 + 1),
                name: format!("{} {}", FIRST_NAMES[i % FIRST_NAMES.len()], i + 1),
                purchases,
                days_since_last_order,
                total_spent: (purchases as f64 * average_order).round(),
                visit_count: purchases + rng.gen_range(0..=60),
                days_since_join: rng.gen_range(days_since_last_order..=days_since_last_order + 730),
            }
        })
        .collect()
}
