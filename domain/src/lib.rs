//! Domain layer for consilium
//!
//! This crate contains the consensus analytics engine and its data model.
//! It has no dependencies on infrastructure or presentation concerns and
//! performs no I/O: every computation here is pure, synchronous, and
//! deterministic.
//!
//! # Core Concepts
//!
//! ## Positions
//!
//! Each participant's structured evaluation is encoded into a fixed-size
//! position vector over a canonical aspect catalog, making heterogeneous
//! nested evaluations comparable.
//!
//! ## Consensus measurement
//!
//! Pairwise cosine similarity feeds three independent views of one round:
//! a composite consensus score, opinion clusters from thresholded-graph
//! community detection, and per-aspect disagreements ranked by severity.
//!
//! ## Weighted decision
//!
//! Categorical votes are tallied under a convex combination of expertise,
//! stake, and contribution weights, with an explicit tie-break policy.
//!
//! ## Delphi rounds
//!
//! A coordinator owns the append-only round history and derives
//! convergence, stability, diversity, and participation across rounds.

pub mod consensus;
pub mod core;
pub mod evaluation;

// Re-export commonly used types
pub use consensus::{
    ClusterDetector, CompromiseSuggestion, ConsensusAnalyzer, ConsensusScorer,
    DEFAULT_MIN_CONSENSUS, DEFAULT_SIMILARITY_THRESHOLD, DelphiCoordinator, Disagreement,
    DisagreementAnalyzer,
    DisagreementThresholds, DiscussionAnalysis, DiscussionSession, ExpectedImpact, NextStep,
    OpinionCluster, PositionEncoder, PositionVector, ResolutionApproach, ResolutionRationale,
    RoleWeights, RoundMetrics, RoundResult, SchemeImportance, ScoreWeights, SessionMetrics,
    SeverityWeights, SimilarityMatrix, SuggestedResolution, TieBreak, WeightScheme, WeightTable,
    WeightedDecision, WeightedVoteAggregator,
};
pub use core::{EngineError, Proposal};
pub use evaluation::{
    AspectCatalog, EvaluationRecord, NEUTRAL_SCORE, VoteChoice, VoteRecord, VoteTally,
};
