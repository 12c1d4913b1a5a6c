//! Segment rule evaluator: validates segment definitions and estimates
//! their audience size.

use std::sync::Arc;

use crm_core::types::CustomerRecord;
use crm_core::{CrmError, CrmResult};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::predicates::{matches_all, Condition, LogicOperator};

/// Smallest audience the mock estimator reports.
pub const MIN_MOCK_ESTIMATE: u64 = 50;
/// Largest audience the mock estimator reports.
pub const MAX_MOCK_ESTIMATE: u64 = 549;

/// A named segment definition as submitted by the segment builder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logic_operator: LogicOperator,
    pub conditions: Vec<Condition>,
}

impl SegmentDefinition {
    /// Check name, condition count and every condition value.
    pub fn validate(&self) -> CrmResult<()> {
        if self.name.trim().is_empty() {
            return Err(CrmError::validation("Segment name is required"));
        }
        if self.conditions.is_empty() {
            return Err(CrmError::validation("At least one condition is required"));
        }
        for condition in &self.conditions {
            condition.numeric_value()?;
        }
        Ok(())
    }
}

/// Source of audience sizes for a validated definition.
pub trait AudienceEstimator: Send + Sync {
    fn estimate(&self, definition: &SegmentDefinition) -> u64;

    /// Whether `count` is an estimate this estimator could have produced for
    /// `definition`.
    fn could_produce(&self, definition: &SegmentDefinition, count: u64) -> bool;

    fn name(&self) -> &'static str;
}

/// Placeholder estimator: a uniform draw from
/// `[MIN_MOCK_ESTIMATE, MAX_MOCK_ESTIMATE]`, independent of the conditions.
pub struct MockAudienceEstimator {
    rng: Option<Mutex<StdRng>>,
}

impl MockAudienceEstimator {
    pub fn new() -> Self {
        Self { rng: None }
    }

    /// Deterministic sequence for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }
}

impl Default for MockAudienceEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl AudienceEstimator for MockAudienceEstimator {
    fn estimate(&self, _definition: &SegmentDefinition) -> u64 {
        match &self.rng {
            Some(rng) => rng.lock().gen_range(MIN_MOCK_ESTIMATE..=MAX_MOCK_ESTIMATE),
            None => rand::thread_rng().gen_range(MIN_MOCK_ESTIMATE..=MAX_MOCK_ESTIMATE),
        }
    }

    fn could_produce(&self, _definition: &SegmentDefinition, count: u64) -> bool {
        (MIN_MOCK_ESTIMATE..=MAX_MOCK_ESTIMATE).contains(&count)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Anything that can hand out the current customer records.
pub trait CustomerSource: Send + Sync {
    fn customers(&self) -> Vec<CustomerRecord>;
}

impl CustomerSource for Vec<CustomerRecord> {
    fn customers(&self) -> Vec<CustomerRecord> {
        self.clone()
    }
}

/// Counts the customers that satisfy the definition's conditions.
pub struct PredicateAudienceEstimator {
    source: Arc<dyn CustomerSource>,
}

impl PredicateAudienceEstimator {
    pub fn new(source: Arc<dyn CustomerSource>) -> Self {
        Self { source }
    }
}

impl AudienceEstimator for PredicateAudienceEstimator {
    fn estimate(&self, definition: &SegmentDefinition) -> u64 {
        self.source
            .customers()
            .iter()
            .filter(|c| matches_all(&definition.conditions, definition.logic_operator, c))
            .count() as u64
    }

    fn could_produce(&self, definition: &SegmentDefinition, count: u64) -> bool {
        self.estimate(definition) == count
    }

    fn name(&self) -> &'static str {
        "predicate"
    }
}

/// Validates definitions and delegates sizing to an [`AudienceEstimator`].
pub struct SegmentationEngine {
    estimator: Arc<dyn AudienceEstimator>,
}

impl SegmentationEngine {
    pub fn new(estimator: Arc<dyn AudienceEstimator>) -> Self {
        Self { estimator }
    }

    /// Estimate the audience of a definition. Each call draws a fresh
    /// estimate; nothing is cached between previews.
    pub fn evaluate(&self, definition: &SegmentDefinition) -> CrmResult<u64> {
        definition.validate()?;
        let count = self.estimator.estimate(definition);
        debug!(
            segment = %definition.name,
            conditions = definition.conditions.len(),
            logic = ?definition.logic_operator,
            estimator = self.estimator.name(),
            count,
            "Segment evaluated"
        );
        Ok(count)
    }

    /// Audience count for a segment being created. A count carried over
    /// from a preview is kept if the estimator could have produced it; a
    /// missing or zero count is estimated afresh.
    pub fn resolve_count(
        &self,
        definition: &SegmentDefinition,
        preview_count: Option<u64>,
    ) -> CrmResult<u64> {
        definition.validate()?;
        match preview_count.filter(|&n| n > 0) {
            None => self.evaluate(definition),
            Some(n) if self.estimator.could_produce(definition, n) => Ok(n),
            Some(n) => Err(CrmError::validation(format!(
                "Audience count {n} does not match this segment; preview it again"
            ))),
        }
    }
}

impl Default for SegmentationEngine {
    fn default() -> Self {
        Self::new(Arc::new(MockAudienceEstimator::new()))
    }
}
