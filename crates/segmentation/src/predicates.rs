//! Condition types and evaluation logic for segment rules.

use crm_core::types::CustomerRecord;
use crm_core::{CrmError, CrmResult};
use serde::{Deserialize, Serialize};

/// How the conditions of a segment combine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicOperator {
    /// Customer must match all conditions.
    #[default]
    And,
    /// Customer must match any condition.
    Or,
}

/// Customer attribute a condition tests. All fields are numeric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConditionField {
    #[default]
    Purchases,
    LastOrder,
    TotalSpent,
    VisitCount,
    JoinDate,
}

impl ConditionField {
    pub const ALL: [ConditionField; 5] = [
        ConditionField::Purchases,
        ConditionField::LastOrder,
        ConditionField::TotalSpent,
        ConditionField::VisitCount,
        ConditionField::JoinDate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConditionField::Purchases => "Total Purchases",
            ConditionField::LastOrder => "Days Since Last Order",
            ConditionField::TotalSpent => "Total Amount Spent",
            ConditionField::VisitCount => "Visit Count",
            ConditionField::JoinDate => "Days Since Join Date",
        }
    }

    /// Read the attribute this field addresses from a customer record.
    pub fn read(&self, customer: &CustomerRecord) -> f64 {
        match self {
            ConditionField::Purchases => customer.purchases as f64,
            ConditionField::LastOrder => customer.days_since_last_order as f64,
            ConditionField::TotalSpent => customer.total_spent,
            ConditionField::VisitCount => customer.visit_count as f64,
            ConditionField::JoinDate => customer.days_since_join as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    #[default]
    GreaterThan,
    LessThan,
    Equals,
    NotEquals,
}

impl ConditionOperator {
    pub const ALL: [ConditionOperator; 4] = [
        ConditionOperator::GreaterThan,
        ConditionOperator::LessThan,
        ConditionOperator::Equals,
        ConditionOperator::NotEquals,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConditionOperator::GreaterThan => "Greater Than",
            ConditionOperator::LessThan => "Less Than",
            ConditionOperator::Equals => "Equals",
            ConditionOperator::NotEquals => "Not Equals",
        }
    }

    pub fn compare(&self, actual: f64, expected: f64) -> bool {
        match self {
            ConditionOperator::GreaterThan => actual > expected,
            ConditionOperator::LessThan => actual < expected,
            ConditionOperator::Equals => actual == expected,
            ConditionOperator::NotEquals => actual != expected,
        }
    }
}

/// A single field/operator/value rule. `value` holds the raw user input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Condition {
    pub field: ConditionField,
    pub operator: ConditionOperator,
    pub value: String,
}

impl Condition {
    pub fn new(field: ConditionField, operator: ConditionOperator, value: impl Into<String>) -> Self {
        Self {
            field,
            operator,
            value: value.into(),
        }
    }

    /// Parse the value as a number. Empty and unparseable values are rejected.
    pub fn numeric_value(&self) -> CrmResult<f64> {
        let raw = self.value.trim();
        if raw.is_empty() {
            return Err(CrmError::validation("All condition values must be filled"));
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(CrmError::validation(format!(
                "Value '{}' for {} is not a number",
                raw,
                self.field.label()
            ))),
        }
    }

    /// Test a customer against this condition. Callers validate first; an
    /// unparseable value never matches.
    pub fn matches(&self, customer: &CustomerRecord) -> bool {
        self.numeric_value()
            .map(|expected| self.operator.compare(self.field.read(customer), expected))
            .unwrap_or(false)
    }
}

/// Combine conditions with AND/OR against one customer.
pub fn matches_all(conditions: &[Condition], logic: LogicOperator, customer: &CustomerRecord) -> bool {
    match logic {
        LogicOperator::And => conditions.iter().all(|c| c.matches(customer)),
        LogicOperator::Or => conditions.iter().any(|c| c.matches(customer)),
    }
}
