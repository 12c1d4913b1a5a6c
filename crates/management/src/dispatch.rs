//! Simulated campaign dispatch.
//!
//! A send is atomic: every member of the audience is sent one message and a
//! small random share is reported as failed.

use crm_core::types::CUSTOMER_NAME_PLACEHOLDER;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MIN_FAILURE_RATE: f64 = 0.02;
const MAX_FAILURE_RATE: f64 = 0.09;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: u64,
    pub delivered: u64,
    pub failed: u64,
}

pub struct DeliverySimulator {
    rng: Option<Mutex<StdRng>>,
}

impl DeliverySimulator {
    pub fn new() -> Self {
        Self { rng: None }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    pub fn dispatch(&self, audience: u64) -> DeliveryReport {
        let rate = match &self.rng {
            Some(rng) => rng.lock().gen_range(MIN_FAILURE_RATE..=MAX_FAILURE_RATE),
            None => rand::thread_rng().gen_range(MIN_FAILURE_RATE..=MAX_FAILURE_RATE),
        };
        let failed = ((audience as f64 * rate).round() as u64).min(audience);
        DeliveryReport {
            sent: audience,
            delivered: audience - failed,
            failed,
        }
    }
}

impl Default for DeliverySimulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve every `[Customer Name]` placeholder in a template.
pub fn personalize(template: &str, customer_name: &str) -> String {
    template.replace(CUSTOMER_NAME_PLACEHOLDER, customer_name)
}
