//! Weighted vote aggregation
//!
//! Combines three weighting schemes - expertise, stake, and contribution -
//! into one weight per participant, then tallies the categorical votes
//! under those weights. Ties never resolve implicitly: the caller chooses
//! a [`TieBreak`] policy up front.

use super::encoder::{PositionEncoder, aspect_scalar};
use super::similarity::SimilarityMatrix;
use crate::core::EngineError;
use crate::evaluation::{
    AspectCatalog, EvaluationRecord, NEUTRAL_SCORE, VoteChoice, VoteRecord, VoteTally,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Tolerance for detecting tied weighted tallies
const TALLY_EPSILON: f64 = 1e-9;

/// Named weighting schemes for a participant's influence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightScheme {
    /// Configured per-role weight table
    Expertise,
    /// How far the participant's stances deviate from neutral
    Stake,
    /// How close the participant sits to the rest of the group
    Contribution,
}

impl std::fmt::Display for WeightScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WeightScheme::Expertise => "expertise",
            WeightScheme::Stake => "stake",
            WeightScheme::Contribution => "contribution",
        };
        write!(f, "{}", name)
    }
}

/// Relative importance of the three weighting schemes.
///
/// Treated as a convex combination; the values are normalized before use
/// so only their proportions matter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemeImportance {
    pub expertise: f64,
    pub stake: f64,
    pub contribution: f64,
}

impl Default for SchemeImportance {
    fn default() -> Self {
        Self {
            expertise: 0.4,
            stake: 0.3,
            contribution: 0.3,
        }
    }
}

impl SchemeImportance {
    fn normalized(&self) -> Self {
        let total = self.expertise + self.stake + self.contribution;
        if total <= 0.0 {
            return Self {
                expertise: 1.0 / 3.0,
                stake: 1.0 / 3.0,
                contribution: 1.0 / 3.0,
            };
        }
        Self {
            expertise: self.expertise / total,
            stake: self.stake / total,
            contribution: self.contribution / total,
        }
    }
}

/// Per-role base weights for the expertise scheme.
///
/// Roles missing from the table fall back to `default_weight`, so an
/// unfamiliar participant still gets a voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleWeights {
    pub weights: BTreeMap<String, f64>,
    pub default_weight: f64,
}

impl Default for RoleWeights {
    fn default() -> Self {
        Self {
            weights: BTreeMap::new(),
            default_weight: 0.1,
        }
    }
}

impl RoleWeights {
    pub fn new(weights: BTreeMap<String, f64>, default_weight: f64) -> Self {
        Self {
            weights,
            default_weight,
        }
    }

    /// Base weight for a participant
    pub fn get(&self, participant: &str) -> f64 {
        self.weights
            .get(participant)
            .copied()
            .unwrap_or(self.default_weight)
    }
}

/// Explicit policy for resolving a tied weighted tally.
///
/// There is deliberately no default: a tie outcome is a governance
/// decision, not an engine detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// A tied board takes no side
    PreferAbstain,
    /// A tied board fails the proposal
    PreferOppose,
    /// A tied board passes the proposal
    PreferSupport,
}

impl TieBreak {
    /// Pick the winner among tied choices, deterministically
    fn resolve(&self, candidates: &BTreeSet<VoteChoice>) -> VoteChoice {
        let priority: [VoteChoice; 3] = match self {
            TieBreak::PreferAbstain => {
                [VoteChoice::Abstain, VoteChoice::Oppose, VoteChoice::Support]
            }
            TieBreak::PreferOppose => {
                [VoteChoice::Oppose, VoteChoice::Abstain, VoteChoice::Support]
            }
            TieBreak::PreferSupport => {
                [VoteChoice::Support, VoteChoice::Abstain, VoteChoice::Oppose]
            }
        };
        priority
            .into_iter()
            .find(|c| candidates.contains(c))
            .unwrap_or(VoteChoice::Abstain)
    }
}

/// Normalized participant-to-weight table summing to 1.
///
/// When the raw weights carry no mass at all, every participant gets an
/// equal share instead - a defined fallback, never a division fault.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightTable(BTreeMap<String, f64>);

impl WeightTable {
    /// Normalize raw weights to sum to 1, with the uniform fallback
    pub fn from_raw(raw: BTreeMap<String, f64>) -> Self {
        let total: f64 = raw.values().sum();
        if raw.is_empty() {
            return Self(raw);
        }
        if total <= 0.0 {
            let share = 1.0 / raw.len() as f64;
            return Self(raw.into_keys().map(|k| (k, share)).collect());
        }
        Self(raw.into_iter().map(|(k, v)| (k, v / total)).collect())
    }

    /// Weight for a participant (0.0 if absent)
    pub fn get(&self, participant: &str) -> f64 {
        self.0.get(participant).copied().unwrap_or(0.0)
    }

    /// Sum of all weights (1.0 unless the table is empty)
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Outcome of a weighted categorical vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedDecision {
    /// Winning category
    pub decision: VoteChoice,
    /// Winning category's share of the total weight
    pub confidence: f64,
    /// Combined per-participant weights (sum 1)
    pub weights: WeightTable,
    /// Per-scheme weight breakdown, before combination
    pub scheme_weights: BTreeMap<WeightScheme, WeightTable>,
    /// Weighted tally per category
    pub tallies: BTreeMap<VoteChoice, f64>,
    /// Raw (unweighted) counts
    pub counts: VoteTally,
}

/// Aggregates categorical votes under multi-scheme participant weights.
pub struct WeightedVoteAggregator {
    encoder: PositionEncoder,
    role_weights: RoleWeights,
    importance: SchemeImportance,
    tie_break: TieBreak,
}

impl WeightedVoteAggregator {
    pub fn new(
        catalog: AspectCatalog,
        role_weights: RoleWeights,
        importance: SchemeImportance,
        tie_break: TieBreak,
    ) -> Self {
        Self {
            encoder: PositionEncoder::new(catalog),
            role_weights,
            importance,
            tie_break,
        }
    }

    /// Aggregate one round's votes against its evaluation records.
    ///
    /// Every vote must come from a participant with an evaluation record
    /// in the same round; anything else is a caller bug surfaced as
    /// [`EngineError`]. Numeric edge cases (nobody voted, no weight mass)
    /// degrade to defined values instead.
    pub fn aggregate(
        &self,
        votes: &[VoteRecord],
        records: &[EvaluationRecord],
    ) -> Result<WeightedDecision, EngineError> {
        let mut participants = BTreeSet::new();
        for record in records {
            if !participants.insert(record.participant.as_str()) {
                return Err(EngineError::DuplicateParticipant(record.participant.clone()));
            }
        }
        for vote in votes {
            if !participants.contains(vote.participant.as_str()) {
                return Err(EngineError::UnknownVoter(vote.participant.clone()));
            }
        }

        let scheme_weights = BTreeMap::from([
            (WeightScheme::Expertise, self.expertise_weights(records)),
            (WeightScheme::Stake, self.stake_weights(records)),
            (WeightScheme::Contribution, self.contribution_weights(records)),
        ]);

        let importance = self.importance.normalized();
        let combined_raw: BTreeMap<String, f64> = records
            .iter()
            .map(|r| {
                let p = r.participant.as_str();
                let combined = importance.expertise
                    * scheme_weights[&WeightScheme::Expertise].get(p)
                    + importance.stake * scheme_weights[&WeightScheme::Stake].get(p)
                    + importance.contribution
                        * scheme_weights[&WeightScheme::Contribution].get(p);
                (r.participant.clone(), combined)
            })
            .collect();
        let weights = WeightTable::from_raw(combined_raw);

        let mut tallies: BTreeMap<VoteChoice, f64> =
            VoteChoice::ALL.iter().map(|c| (*c, 0.0)).collect();
        for vote in votes {
            *tallies.get_mut(&vote.choice).unwrap() += weights.get(&vote.participant);
        }

        let top = tallies.values().copied().fold(0.0_f64, f64::max);
        let candidates: BTreeSet<VoteChoice> = tallies
            .iter()
            .filter(|(_, tally)| (top - **tally).abs() < TALLY_EPSILON)
            .map(|(choice, _)| *choice)
            .collect();
        let decision = if candidates.len() == 1 {
            *candidates.first().unwrap()
        } else {
            self.tie_break.resolve(&candidates)
        };

        let total = weights.total();
        let confidence = if total > 0.0 { tallies[&decision] / total } else { 0.0 };

        Ok(WeightedDecision {
            decision,
            confidence,
            weights,
            scheme_weights,
            tallies,
            counts: VoteTally::from_votes(votes),
        })
    }

    /// Expertise: the configured role table, normalized
    fn expertise_weights(&self, records: &[EvaluationRecord]) -> WeightTable {
        WeightTable::from_raw(
            records
                .iter()
                .map(|r| (r.participant.clone(), self.role_weights.get(&r.participant)))
                .collect(),
        )
    }

    /// Stake: mean deviation of the participant's aspect stances from
    /// neutral, scaled into [0, 1]. A participant scoring everything at
    /// the neutral default carries no stake signal.
    fn stake_weights(&self, records: &[EvaluationRecord]) -> WeightTable {
        let catalog = self.encoder.catalog();
        WeightTable::from_raw(
            records
                .iter()
                .map(|r| {
                    let deviations: Vec<f64> = catalog
                        .iter()
                        .map(|aspect| (aspect_scalar(r, aspect) - NEUTRAL_SCORE).abs() * 2.0)
                        .collect();
                    let stake = if deviations.is_empty() {
                        0.0
                    } else {
                        deviations.iter().sum::<f64>() / deviations.len() as f64
                    };
                    (r.participant.clone(), stake)
                })
                .collect(),
        )
    }

    /// Contribution: mean similarity of the participant's position to
    /// every other position this round. Sitting close to the group reads
    /// as pull toward consensus; degenerate positions contribute nothing.
    fn contribution_weights(&self, records: &[EvaluationRecord]) -> WeightTable {
        let vectors = self.encoder.encode_all(records);
        let matrix = SimilarityMatrix::from_vectors(&vectors);
        let count = records.len();

        WeightTable::from_raw(
            records
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    let pull = if count < 2 {
                        0.0
                    } else {
                        (0..count)
                            .filter(|j| *j != i)
                            .map(|j| matrix.get(i, j))
                            .sum::<f64>()
                            / (count - 1) as f64
                    };
                    (r.participant.clone(), pull)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn aggregator() -> WeightedVoteAggregator {
        WeightedVoteAggregator::new(
            AspectCatalog::default(),
            RoleWeights::default(),
            SchemeImportance::default(),
            TieBreak::PreferAbstain,
        )
    }

    fn record(participant: &str, budget: f64) -> EvaluationRecord {
        EvaluationRecord::new(participant, 1).with_aspect("budget_analysis", json!(budget))
    }

    #[test]
    fn test_weights_sum_to_one() {
        let records = vec![record("a", 0.9), record("b", 0.4), record("c", 0.1)];
        let votes = vec![
            VoteRecord::support("a", ""),
            VoteRecord::oppose("b", ""),
            VoteRecord::support("c", ""),
        ];

        let decision = aggregator().aggregate(&votes, &records).unwrap();

        assert!((decision.weights.total() - 1.0).abs() < 1e-9);
        for table in decision.scheme_weights.values() {
            assert!((table.total() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_majority_of_equals_wins() {
        let records = vec![record("a", 0.8), record("b", 0.8), record("c", 0.8)];
        let votes = vec![
            VoteRecord::support("a", ""),
            VoteRecord::support("b", ""),
            VoteRecord::oppose("c", ""),
        ];

        let decision = aggregator().aggregate(&votes, &records).unwrap();

        assert_eq!(decision.decision, VoteChoice::Support);
        assert!((decision.confidence - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(decision.counts.support, 2);
    }

    #[test]
    fn test_unknown_voter_is_a_structural_error() {
        let records = vec![record("a", 0.8)];
        let votes = vec![VoteRecord::support("stranger", "")];

        let result = aggregator().aggregate(&votes, &records);
        assert!(matches!(result, Err(EngineError::UnknownVoter(p)) if p == "stranger"));
    }

    #[test]
    fn test_duplicate_record_is_a_structural_error() {
        let records = vec![record("a", 0.8), record("a", 0.2)];
        let result = aggregator().aggregate(&[], &records);
        assert!(matches!(result, Err(EngineError::DuplicateParticipant(p)) if p == "a"));
    }

    #[test]
    fn test_tie_resolves_by_policy() {
        let records = vec![record("a", 0.8), record("b", 0.8)];
        let votes = vec![VoteRecord::support("a", ""), VoteRecord::oppose("b", "")];

        let abstainer = WeightedVoteAggregator::new(
            AspectCatalog::default(),
            RoleWeights::default(),
            SchemeImportance::default(),
            TieBreak::PreferAbstain,
        );
        let opposer = WeightedVoteAggregator::new(
            AspectCatalog::default(),
            RoleWeights::default(),
            SchemeImportance::default(),
            TieBreak::PreferOppose,
        );
        let supporter = WeightedVoteAggregator::new(
            AspectCatalog::default(),
            RoleWeights::default(),
            SchemeImportance::default(),
            TieBreak::PreferSupport,
        );

        assert_eq!(
            abstainer.aggregate(&votes, &records).unwrap().decision,
            VoteChoice::Abstain
        );
        assert_eq!(
            opposer.aggregate(&votes, &records).unwrap().decision,
            VoteChoice::Oppose
        );
        assert_eq!(
            supporter.aggregate(&votes, &records).unwrap().decision,
            VoteChoice::Support
        );
    }

    #[test]
    fn test_role_table_tilts_the_outcome() {
        let role_weights = RoleWeights::new(
            BTreeMap::from([("chair".to_string(), 0.9), ("member".to_string(), 0.05)]),
            0.05,
        );
        let aggregator = WeightedVoteAggregator::new(
            AspectCatalog::default(),
            role_weights,
            // expertise only, so the role table decides alone
            SchemeImportance {
                expertise: 1.0,
                stake: 0.0,
                contribution: 0.0,
            },
            TieBreak::PreferAbstain,
        );

        let records = vec![record("chair", 0.8), record("member", 0.8), record("other", 0.8)];
        let votes = vec![
            VoteRecord::oppose("chair", "too risky"),
            VoteRecord::support("member", ""),
            VoteRecord::support("other", ""),
        ];

        let decision = aggregator.aggregate(&votes, &records).unwrap();
        assert_eq!(decision.decision, VoteChoice::Oppose);
    }

    #[test]
    fn test_no_votes_degrades_to_policy_with_zero_confidence() {
        let records = vec![record("a", 0.8)];
        let decision = aggregator().aggregate(&[], &records).unwrap();

        assert_eq!(decision.decision, VoteChoice::Abstain);
        assert_eq!(decision.confidence, 0.0);
        assert_eq!(decision.counts.total(), 0);
    }

    #[test]
    fn test_empty_round_produces_empty_tables() {
        let decision = aggregator().aggregate(&[], &[]).unwrap();
        assert!(decision.weights.is_empty());
        assert_eq!(decision.confidence, 0.0);
    }

    #[test]
    fn test_all_neutral_stakes_fall_back_to_uniform() {
        // Both participants sit exactly on neutral: raw stake mass is 0
        let records = vec![
            EvaluationRecord::new("a", 1).with_aspect("budget_analysis", json!(0.5)),
            EvaluationRecord::new("b", 1).with_aspect("budget_analysis", json!(0.5)),
        ];
        let decision = aggregator().aggregate(&[], &records).unwrap();
        let stake = &decision.scheme_weights[&WeightScheme::Stake];

        assert!((stake.get("a") - 0.5).abs() < 1e-12);
        assert!((stake.get("b") - 0.5).abs() < 1e-12);
    }
}
