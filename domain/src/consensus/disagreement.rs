//! Disagreement analysis
//!
//! Works aspect by aspect over the raw records, independent of position
//! encoding: for each canonical aspect, the per-participant scalar
//! stances are tested for spread, and significant spreads become ranked
//! disagreements with a suggested resolution.

use super::encoder::aspect_scalar;
use super::stats;
use crate::evaluation::{AspectCatalog, EvaluationRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Spread thresholds above which an aspect counts as disputed.
///
/// An aspect is significant when its range exceeds `range` OR its
/// population variance exceeds `variance` - an explicit OR, so either
/// a wide spread or a fat spread alone qualifies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisagreementThresholds {
    pub range: f64,
    pub variance: f64,
}

impl Default for DisagreementThresholds {
    fn default() -> Self {
        Self {
            range: 0.3,
            variance: 0.05,
        }
    }
}

/// Blend weights for the severity measure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityWeights {
    pub range: f64,
    pub variance: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            range: 0.7,
            variance: 0.3,
        }
    }
}

/// Qualitative read on how much movement a resolution would take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionRationale {
    PositionsClose,
    ModerateAdjustment,
    SignificantCompromise,
}

impl ResolutionRationale {
    /// Bucket by the standard deviation of the positions
    pub fn from_spread(std_dev: f64) -> Self {
        if std_dev < 0.2 {
            ResolutionRationale::PositionsClose
        } else if std_dev < 0.4 {
            ResolutionRationale::ModerateAdjustment
        } else {
            ResolutionRationale::SignificantCompromise
        }
    }
}

impl std::fmt::Display for ResolutionRationale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ResolutionRationale::PositionsClose => "positions already close",
            ResolutionRationale::ModerateAdjustment => "moderate adjustment needed",
            ResolutionRationale::SignificantCompromise => "significant compromise required",
        };
        write!(f, "{}", text)
    }
}

/// A concrete way out of one disagreement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedResolution {
    /// Proposed common value (the median stance)
    pub target: f64,
    /// Qualitative read on the distance to consensus
    pub rationale: ResolutionRationale,
    /// How far each participant would have to move to reach the target
    pub required_movement: BTreeMap<String, f64>,
}

/// One disputed aspect, with per-participant stances and a way out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disagreement {
    /// Canonical aspect name
    pub aspect: String,
    /// Blended range/variance measure of how strongly positions differ
    pub severity: f64,
    /// Scalar stance per participant
    pub positions: BTreeMap<String, f64>,
    /// Suggested resolution
    pub resolution: SuggestedResolution,
}

/// Finds and ranks the aspects participants disagree on.
#[derive(Debug, Clone)]
pub struct DisagreementAnalyzer {
    catalog: AspectCatalog,
    thresholds: DisagreementThresholds,
    weights: SeverityWeights,
}

impl DisagreementAnalyzer {
    pub fn new(catalog: AspectCatalog) -> Self {
        Self {
            catalog,
            thresholds: DisagreementThresholds::default(),
            weights: SeverityWeights::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: DisagreementThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_weights(mut self, weights: SeverityWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Analyze one round's records for significant disagreements.
    ///
    /// Output is sorted by severity descending; equal severities fall
    /// back to aspect-name order so the ranking is deterministic.
    pub fn analyze(&self, records: &[EvaluationRecord]) -> Vec<Disagreement> {
        if records.is_empty() {
            return Vec::new();
        }

        let mut disagreements = Vec::new();
        for aspect in self.catalog.iter() {
            let positions: BTreeMap<String, f64> = records
                .iter()
                .map(|r| (r.participant.clone(), aspect_scalar(r, aspect)))
                .collect();
            let values: Vec<f64> = positions.values().copied().collect();

            let low = values.iter().copied().fold(f64::INFINITY, f64::min);
            let high = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let range = high - low;
            let variance = stats::variance(&values);

            if range <= self.thresholds.range && variance <= self.thresholds.variance {
                continue;
            }

            let severity = self.weights.range * range + self.weights.variance * variance;
            let target = stats::median(&values);
            let required_movement = positions
                .iter()
                .map(|(participant, value)| (participant.clone(), (value - target).abs()))
                .collect();

            disagreements.push(Disagreement {
                aspect: aspect.to_string(),
                severity,
                positions,
                resolution: SuggestedResolution {
                    target,
                    rationale: ResolutionRationale::from_spread(variance.sqrt()),
                    required_movement,
                },
            });
        }

        disagreements.sort_by(|a, b| {
            b.severity
                .total_cmp(&a.severity)
                .then_with(|| a.aspect.cmp(&b.aspect))
        });
        disagreements
    }
}
