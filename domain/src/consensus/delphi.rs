//! Delphi round coordination
//!
//! Holds the ordered history of completed rounds and computes the
//! cross-round measures of an iterative Delphi process: convergence,
//! vote stability, opinion diversity, and participation. The coordinator
//! never decides whether another round should run; that policy belongs
//! to the orchestrating caller.

use super::analyzer::DiscussionAnalysis;
use super::encoder::PositionVector;
use super::scorer::ConsensusScorer;
use super::voting::WeightedDecision;
use crate::evaluation::{VoteChoice, VoteRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The complete outcome of one deliberation round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Round number (1-indexed)
    pub round: u32,
    /// Consensus analytics for this round
    pub analysis: DiscussionAnalysis,
    /// Weighted vote outcome
    pub decision: WeightedDecision,
    /// Encoded position per participant, for cross-round comparison
    pub positions: BTreeMap<String, PositionVector>,
    /// The votes as cast
    pub votes: Vec<VoteRecord>,
    /// Timestamp of this round (milliseconds since epoch)
    pub timestamp: u64,
}

impl RoundResult {
    /// Assemble a round result, stamping it with the current time
    pub fn new(
        round: u32,
        analysis: DiscussionAnalysis,
        decision: WeightedDecision,
        positions: BTreeMap<String, PositionVector>,
        votes: Vec<VoteRecord>,
    ) -> Self {
        Self {
            round,
            analysis,
            decision,
            positions,
            votes,
            timestamp: current_timestamp(),
        }
    }

    /// This round's consensus score
    pub fn consensus_score(&self) -> f64 {
        self.analysis.consensus_score
    }

    /// Number of evaluation records received this round
    pub fn participant_count(&self) -> usize {
        self.positions.len()
    }

    fn vote_map(&self) -> BTreeMap<&str, VoteChoice> {
        self.votes
            .iter()
            .map(|v| (v.participant.as_str(), v.choice))
            .collect()
    }

    fn position_list(&self) -> Vec<&PositionVector> {
        self.positions.values().collect()
    }
}

/// Append-only history of one deliberation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscussionSession {
    rounds: Vec<RoundResult>,
}

impl DiscussionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// All completed rounds, oldest first
    pub fn rounds(&self) -> &[RoundResult] {
        &self.rounds
    }

    /// The most recent round, if any
    pub fn last_round(&self) -> Option<&RoundResult> {
        self.rounds.last()
    }

    /// Number of completed rounds
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    fn push(&mut self, result: RoundResult) {
        self.rounds.push(result);
    }
}

/// Cross-round measures for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundMetrics {
    /// Round number (1-indexed)
    pub round: u32,
    /// Reduction in mean pairwise position distance since the previous
    /// round; positive means positions moved closer. None for round 1.
    pub convergence: Option<f64>,
    /// Fraction of returning voters whose choice is unchanged.
    /// None for round 1.
    pub stability: Option<f64>,
    /// How spread out this round's opinions are (1 minus the
    /// dimension-wise convergence component)
    pub diversity: f64,
    /// Records received over participants expected
    pub participation: f64,
}

/// Cross-round metrics for the whole session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub rounds: Vec<RoundMetrics>,
}

impl SessionMetrics {
    /// Metrics for a specific round number
    pub fn round(&self, round: u32) -> Option<&RoundMetrics> {
        self.rounds.iter().find(|m| m.round == round)
    }
}

/// Owns the session history and derives the Delphi metrics.
///
/// Single-writer: one coordinator instance owns one deliberation's
/// history. The history is append-only and never mutated in place, so
/// completed rounds may be read freely.
#[derive(Debug, Clone)]
pub struct DelphiCoordinator {
    session: DiscussionSession,
    expected_participants: usize,
}

impl DelphiCoordinator {
    pub fn new(expected_participants: usize) -> Self {
        Self {
            session: DiscussionSession::new(),
            expected_participants,
        }
    }

    /// Append a completed round to the session history
    pub fn record_round(&mut self, result: RoundResult) {
        self.session.push(result);
    }

    /// The session history recorded so far
    pub fn session(&self) -> &DiscussionSession {
        &self.session
    }

    /// How many participants each round is expected to hear from
    pub fn expected_participants(&self) -> usize {
        self.expected_participants
    }

    /// Compute the cross-round metric series for the session
    pub fn session_metrics(&self) -> SessionMetrics {
        let rounds = self.session.rounds();
        let mut metrics = Vec::with_capacity(rounds.len());

        for (i, result) in rounds.iter().enumerate() {
            let previous = if i > 0 { Some(&rounds[i - 1]) } else { None };

            let convergence = previous.map(|prev| {
                mean_pairwise_distance(&prev.position_list())
                    - mean_pairwise_distance(&result.position_list())
            });

            let stability = previous.map(|prev| vote_stability(prev, result));

            let positions: Vec<PositionVector> =
                result.positions.values().cloned().collect();
            let diversity = 1.0 - ConsensusScorer::convergence(&positions);

            let participation = if self.expected_participants == 0 {
                0.0
            } else {
                result.participant_count() as f64 / self.expected_participants as f64
            };

            metrics.push(RoundMetrics {
                round: result.round,
                convergence,
                stability,
                diversity,
                participation,
            });
        }

        SessionMetrics { rounds: metrics }
    }
}

/// Mean Euclidean distance over all position pairs; 0.0 below two
fn mean_pairwise_distance(positions: &[&PositionVector]) -> f64 {
    if positions.len() < 2 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut count = 0usize;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            sum += positions[i].distance(positions[j]);
            count += 1;
        }
    }
    sum / count as f64
}

/// Fraction of round-n voters whose choice matches their round n-1 vote.
/// 0.0 when no voter appears in both rounds.
fn vote_stability(previous: &RoundResult, current: &RoundResult) -> f64 {
    let before = previous.vote_map();
    let mut shared = 0usize;
    let mut unchanged = 0usize;
    for vote in &current.votes {
        if let Some(prior) = before.get(vote.participant.as_str()) {
            shared += 1;
            if *prior == vote.choice {
                unchanged += 1;
            }
        }
    }
    if shared == 0 {
        0.0
    } else {
        unchanged as f64 / shared as f64
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::analyzer::ConsensusAnalyzer;
    use crate::consensus::voting::{
        RoleWeights, SchemeImportance, TieBreak, WeightedVoteAggregator,
    };
    use crate::evaluation::{AspectCatalog, EvaluationRecord};
    use serde_json::json;

    /// Build a round where everyone scores budget_analysis at the given
    /// values; tighter values mean closer positions.
    fn build_round(round: u32, scores: &[(&str, f64)], votes: Vec<VoteRecord>) -> RoundResult {
        let catalog = AspectCatalog::default();
        let records: Vec<EvaluationRecord> = scores
            .iter()
            .map(|(p, s)| {
                EvaluationRecord::new(*p, round).with_aspect("budget_analysis", json!(*s))
            })
            .collect();

        let analyzer = ConsensusAnalyzer::new(catalog.clone());
        let analysis = analyzer.analyze(&records);
        let positions: BTreeMap<String, PositionVector> = records
            .iter()
            .map(|r| (r.participant.clone(), analyzer.encoder().encode(r)))
            .collect();

        let aggregator = WeightedVoteAggregator::new(
            catalog,
            RoleWeights::default(),
            SchemeImportance::default(),
            TieBreak::PreferAbstain,
        );
        let decision = aggregator.aggregate(&votes, &records).unwrap();

        RoundResult::new(round, analysis, decision, positions, votes)
    }

    #[test]
    fn test_history_is_append_only_and_ordered() {
        let mut coordinator = DelphiCoordinator::new(2);
        coordinator.record_round(build_round(1, &[("a", 0.9), ("b", 0.1)], vec![]));
        coordinator.record_round(build_round(2, &[("a", 0.7), ("b", 0.3)], vec![]));

        let rounds = coordinator.session().rounds();
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0].round, 1);
        assert_eq!(rounds[1].round, 2);
    }

    #[test]
    fn test_first_round_has_no_convergence_or_stability() {
        let mut coordinator = DelphiCoordinator::new(2);
        coordinator.record_round(build_round(1, &[("a", 0.9), ("b", 0.1)], vec![]));

        let metrics = coordinator.session_metrics();
        assert_eq!(metrics.rounds.len(), 1);
        assert_eq!(metrics.rounds[0].convergence, None);
        assert_eq!(metrics.rounds[0].stability, None);
    }

    #[test]
    fn test_convergence_is_positive_when_positions_close_in() {
        // Positions tighten every round over five rounds
        let spreads = [
            [("a", 0.95), ("b", 0.05)],
            [("a", 0.85), ("b", 0.15)],
            [("a", 0.75), ("b", 0.25)],
            [("a", 0.65), ("b", 0.35)],
            [("a", 0.55), ("b", 0.45)],
        ];

        let mut coordinator = DelphiCoordinator::new(2);
        for (i, scores) in spreads.iter().enumerate() {
            coordinator.record_round(build_round(i as u32 + 1, scores, vec![]));
        }

        let metrics = coordinator.session_metrics();
        for round in 2..=5u32 {
            let convergence = metrics.round(round).unwrap().convergence.unwrap();
            assert!(
                convergence > 0.0,
                "round {} convergence {} not positive",
                round,
                convergence
            );
        }
    }

    #[test]
    fn test_stability_counts_unchanged_votes() {
        let first_votes = vec![
            VoteRecord::support("a", ""),
            VoteRecord::oppose("b", ""),
            VoteRecord::abstain("c", ""),
        ];
        let second_votes = vec![
            VoteRecord::support("a", ""),
            VoteRecord::support("b", ""),
            VoteRecord::abstain("c", ""),
        ];
        let scores = [("a", 0.8), ("b", 0.4), ("c", 0.6)];

        let mut coordinator = DelphiCoordinator::new(3);
        coordinator.record_round(build_round(1, &scores, first_votes));
        coordinator.record_round(build_round(2, &scores, second_votes));

        let stability = coordinator.session_metrics().rounds[1].stability.unwrap();
        assert!((stability - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_stability_with_no_returning_voters_is_zero() {
        let mut coordinator = DelphiCoordinator::new(2);
        coordinator.record_round(build_round(
            1,
            &[("a", 0.8), ("b", 0.4)],
            vec![VoteRecord::support("a", "")],
        ));
        coordinator.record_round(build_round(
            2,
            &[("a", 0.8), ("b", 0.4)],
            vec![VoteRecord::support("b", "")],
        ));

        assert_eq!(coordinator.session_metrics().rounds[1].stability, Some(0.0));
    }

    #[test]
    fn test_diversity_tracks_spread() {
        let mut tight = DelphiCoordinator::new(2);
        tight.record_round(build_round(1, &[("a", 0.5), ("b", 0.5)], vec![]));
        let mut spread = DelphiCoordinator::new(2);
        spread.record_round(build_round(1, &[("a", 1.0), ("b", 0.0)], vec![]));

        let tight_diversity = tight.session_metrics().rounds[0].diversity;
        let spread_diversity = spread.session_metrics().rounds[0].diversity;
        assert!(spread_diversity > tight_diversity);
    }

    #[test]
    fn test_participation_rate() {
        let mut coordinator = DelphiCoordinator::new(4);
        coordinator.record_round(build_round(1, &[("a", 0.8), ("b", 0.4)], vec![]));

        let metrics = coordinator.session_metrics();
        assert!((metrics.rounds[0].participation - 0.5).abs() < 1e-12);

        // Zero expected participants never divides; it reads as 0.0
        let mut empty_board = DelphiCoordinator::new(0);
        empty_board.record_round(build_round(1, &[("a", 0.8)], vec![]));
        assert_eq!(empty_board.session_metrics().rounds[0].participation, 0.0);
    }
}
