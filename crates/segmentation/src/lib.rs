//! Segment rule evaluation: conditions, AND/OR logic, audience estimation,
//! and the condition draft used while authoring a segment.

pub mod builder;
pub mod engine;
pub mod predicates;

pub use builder::SegmentDraft;
pub use engine::{
    AudienceEstimator, CustomerSource, MockAudienceEstimator, PredicateAudienceEstimator,
    SegmentDefinition, SegmentationEngine,
};
pub use predicates::{Condition, ConditionField, ConditionOperator, LogicOperator};
