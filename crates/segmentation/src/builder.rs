//! Segment draft: the mutable condition list authored before a segment
//! is created.
//!
//! The dashboard edits its draft locally and submits it together with the
//! count of its last preview; the server rebuilds it with
//! [`SegmentDraft::submitted`] and sizes it for create.

use crm_core::{CrmError, CrmResult};

use crate::engine::{SegmentDefinition, SegmentationEngine};
use crate::predicates::{Condition, LogicOperator};

/// Authoring state for a new segment. Always holds at least one condition.
#[derive(Debug, Clone)]
pub struct SegmentDraft {
    name: String,
    description: String,
    logic_operator: LogicOperator,
    conditions: Vec<Condition>,
    audience_count: Option<u64>,
}

impl SegmentDraft {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            logic_operator: LogicOperator::And,
            conditions: vec![Condition::default()],
            audience_count: None,
        }
    }

    /// Rebuild a draft submitted by the dashboard, carrying the count of its
    /// last preview.
    pub fn submitted(definition: SegmentDefinition, audience_count: Option<u64>) -> CrmResult<Self> {
        if definition.conditions.is_empty() {
            return Err(CrmError::validation("At least one condition is required"));
        }
        Ok(Self {
            name: definition.name,
            description: definition.description,
            logic_operator: definition.logic_operator,
            conditions: definition.conditions,
            audience_count,
        })
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_or(mut self) -> Self {
        self.logic_operator = LogicOperator::Or;
        self
    }

    pub fn set_logic(&mut self, logic: LogicOperator) {
        self.logic_operator = logic;
    }

    /// Append a fresh default condition.
    pub fn add_condition(&mut self) {
        self.conditions.push(Condition::default());
    }

    /// Replace the condition at `index`. Returns false if out of range.
    pub fn update_condition(&mut self, index: usize, condition: Condition) -> bool {
        match self.conditions.get_mut(index) {
            Some(slot) => {
                *slot = condition;
                true
            }
            None => false,
        }
    }

    /// Remove the condition at `index`. No-op when it is the last one left
    /// or the index is out of range.
    pub fn remove_condition(&mut self, index: usize) -> bool {
        if self.conditions.len() <= 1 || index >= self.conditions.len() {
            return false;
        }
        self.conditions.remove(index);
        true
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Last previewed audience count, if any.
    pub fn audience_count(&self) -> Option<u64> {
        self.audience_count
    }

    pub fn definition(&self) -> SegmentDefinition {
        SegmentDefinition {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            logic_operator: self.logic_operator,
            conditions: self.conditions.clone(),
        }
    }

    /// Estimate the audience and remember the count for create.
    pub fn preview(&mut self, engine: &SegmentationEngine) -> CrmResult<u64> {
        let count = engine.evaluate(&self.definition())?;
        self.audience_count = Some(count);
        Ok(count)
    }

    /// Audience count to store on create. The last preview count is kept
    /// when the engine accepts it; otherwise a fresh estimate is taken.
    pub fn audience_for_create(&self, engine: &SegmentationEngine) -> CrmResult<u64> {
        engine.resolve_count(&self.definition(), self.audience_count)
    }

    /// Back to a blank draft with one default condition.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SegmentDraft {
    fn default() -> Self {
        Self::new()
    }
}
