//! Engine configuration
//!
//! [`ConsensusConfig`] is the boundary with the configuration
//! collaborator: one serde-friendly struct carrying everything the
//! engine components are parameterized by. Loading and merging config
//! sources is the host binary's job; this module only defines the typed
//! shape, its defaults, and factories for the configured components.

use consilium_domain::{
    AspectCatalog, ClusterDetector, ConsensusAnalyzer, ConsensusScorer, DelphiCoordinator,
    DisagreementAnalyzer, DisagreementThresholds, RoleWeights, SchemeImportance, ScoreWeights,
    SeverityWeights, TieBreak, WeightedVoteAggregator,
};
use serde::{Deserialize, Serialize};

/// Complete parameter set for one deployment of the consensus engine.
///
/// The aspect list must not change while a discussion session is open;
/// cross-round comparisons assume one fixed catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Canonical aspect names, in encoding order
    pub aspects: Vec<String>,
    /// Similarity two opinions must exceed to be linked when clustering
    pub similarity_threshold: f64,
    /// Consensus score at which next-step recommendations stop
    pub min_consensus: f64,
    /// Spread thresholds for flagging a disagreement
    pub disagreement: DisagreementThresholds,
    /// Blend weights for disagreement severity
    pub severity: SeverityWeights,
    /// Blend weights for the consensus score
    pub score: ScoreWeights,
    /// Relative importance of the voting weight schemes
    pub scheme_importance: SchemeImportance,
    /// Per-role base weights for the expertise scheme
    pub role_weights: RoleWeights,
    /// Explicit tie-break policy for the weighted vote
    pub tie_break: TieBreak,
    /// Participants expected per round; 0 means "however many
    /// evaluators are seated"
    pub expected_participants: usize,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            aspects: AspectCatalog::default().names().to_vec(),
            similarity_threshold: consilium_domain::DEFAULT_SIMILARITY_THRESHOLD,
            min_consensus: consilium_domain::DEFAULT_MIN_CONSENSUS,
            disagreement: DisagreementThresholds::default(),
            severity: SeverityWeights::default(),
            score: ScoreWeights::default(),
            scheme_importance: SchemeImportance::default(),
            role_weights: RoleWeights::default(),
            // A tied board takes no side unless configured otherwise
            tie_break: TieBreak::PreferAbstain,
            expected_participants: 0,
        }
    }
}

impl ConsensusConfig {
    /// The configured aspect catalog
    pub fn catalog(&self) -> AspectCatalog {
        AspectCatalog::new(self.aspects.clone())
    }

    /// Build the round analyzer these parameters describe
    pub fn analyzer(&self) -> ConsensusAnalyzer {
        ConsensusAnalyzer::new(self.catalog())
            .with_scorer(ConsensusScorer::with_weights(self.score))
            .with_cluster_detector(ClusterDetector::with_threshold(self.similarity_threshold))
            .with_disagreement_analyzer(
                DisagreementAnalyzer::new(self.catalog())
                    .with_thresholds(self.disagreement)
                    .with_weights(self.severity),
            )
            .with_min_consensus(self.min_consensus)
    }

    /// Build the configured vote aggregator
    pub fn aggregator(&self) -> WeightedVoteAggregator {
        WeightedVoteAggregator::new(
            self.catalog(),
            self.role_weights.clone(),
            self.scheme_importance,
            self.tie_break,
        )
    }

    /// Build a session coordinator, falling back to the seated evaluator
    /// count when no expectation was configured
    pub fn coordinator(&self, seated: usize) -> DelphiCoordinator {
        let expected = if self.expected_participants > 0 {
            self.expected_participants
        } else {
            seated
        };
        DelphiCoordinator::new(expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_complete() {
        let config = ConsensusConfig::default();
        assert_eq!(config.aspects.len(), 8);
        assert_eq!(config.similarity_threshold, 0.7);
        assert_eq!(config.tie_break, TieBreak::PreferAbstain);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ConsensusConfig = serde_json::from_value(serde_json::json!({
            "similarity_threshold": 0.8,
            "role_weights": {"weights": {"chair": 0.3}, "default_weight": 0.05},
        }))
        .unwrap();

        assert_eq!(config.similarity_threshold, 0.8);
        assert_eq!(config.role_weights.get("chair"), 0.3);
        assert_eq!(config.role_weights.get("unknown"), 0.05);
        // untouched fields keep their defaults
        assert_eq!(config.aspects.len(), 8);
        assert_eq!(config.min_consensus, 0.7);
    }

    #[test]
    fn test_coordinator_falls_back_to_seated_count() {
        let config = ConsensusConfig::default();
        assert_eq!(config.coordinator(5).expected_participants(), 5);

        let fixed = ConsensusConfig {
            expected_participants: 9,
            ..ConsensusConfig::default()
        };
        assert_eq!(fixed.coordinator(5).expected_participants(), 9);
    }
}
