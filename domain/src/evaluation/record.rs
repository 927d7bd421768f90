//! Evaluation records and unit-score extraction
//!
//! An [`EvaluationRecord`] is what one participant hands the engine for one
//! round: a map from aspect names to arbitrarily nested JSON payloads. The
//! engine never interprets the nesting beyond the extraction rule below.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One participant's structured evaluation of a proposal for one round.
///
/// Immutable input to the engine, produced by an evaluator collaborator.
/// Aspect payloads may be numbers, nested maps, or arrays in any
/// combination; only numeric leaves within `[0, 1]` are ever read.
///
/// # Example
///
/// ```
/// use consilium_domain::evaluation::EvaluationRecord;
/// use serde_json::json;
///
/// let record = EvaluationRecord::new("academic_affairs", 1)
///     .with_aspect("academic_quality", json!({"program_rigor": 0.9, "faculty_expertise": 0.8}))
///     .with_aspect("budget_analysis", json!([0.4, 0.6]));
///
/// assert_eq!(record.unit_scores("academic_quality"), vec![0.8, 0.9]);
/// assert_eq!(record.aspect_mean("budget_analysis"), Some(0.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Participant identifier (typically the board role)
    pub participant: String,
    /// Round number this record belongs to (1-indexed)
    pub round: u32,
    /// Aspect name to nested score payload
    pub aspects: BTreeMap<String, Value>,
}

impl EvaluationRecord {
    /// Create an empty record for a participant and round
    pub fn new(participant: impl Into<String>, round: u32) -> Self {
        Self {
            participant: participant.into(),
            round,
            aspects: BTreeMap::new(),
        }
    }

    /// Attach an aspect payload
    pub fn with_aspect(mut self, name: impl Into<String>, value: Value) -> Self {
        self.aspects.insert(name.into(), value);
        self
    }

    /// Get the raw payload for an aspect, if present
    pub fn aspect(&self, name: &str) -> Option<&Value> {
        self.aspects.get(name)
    }

    /// All valid unit scores found under an aspect, in ascending order.
    ///
    /// Recursively flattens nested maps and arrays, collecting numeric
    /// leaves within `[0, 1]`. Out-of-range numbers are discarded, not
    /// clamped; non-numeric leaves are ignored. Missing aspects yield an
    /// empty list.
    pub fn unit_scores(&self, aspect: &str) -> Vec<f64> {
        let mut scores = Vec::new();
        if let Some(value) = self.aspects.get(aspect) {
            collect_unit_scores(value, &mut scores);
        }
        scores.sort_by(f64::total_cmp);
        scores
    }

    /// Mean of the valid unit scores under an aspect, or `None` if the
    /// aspect is absent or yielded nothing usable.
    pub fn aspect_mean(&self, aspect: &str) -> Option<f64> {
        let scores = self.unit_scores(aspect);
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    }
}

/// Recursively collect numeric leaves within `[0, 1]` from a payload.
fn collect_unit_scores(value: &Value, out: &mut Vec<f64>) {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_f64() {
                if (0.0..=1.0).contains(&v) {
                    out.push(v);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_unit_scores(item, out);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                collect_unit_scores(item, out);
            }
        }
        // Strings, booleans and nulls are opaque to the engine
        _ => {}
    }
}
