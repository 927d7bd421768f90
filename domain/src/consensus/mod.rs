//! Consensus analytics engine
//!
//! This module contains the core measurement pipeline for board-style
//! deliberation:
//!
//! ```text
//! EvaluationRecords ──► PositionEncoder ──► PositionVectors
//!                                             │
//!            ┌────────────────────────────────┼──────────────────┐
//!            ▼                                ▼                  ▼
//!     ConsensusScorer                  ClusterDetector    (raw records)
//!     (score in [0,1])                 (opinion groups)   DisagreementAnalyzer
//!            │                                │           (ranked disputes)
//!            └───────────────┬────────────────┴──────────────────┘
//!                            ▼
//!                    DiscussionAnalysis  +  WeightedVoteAggregator
//!                            │                      │
//!                            └───────► RoundResult ◄┘
//!                                          │
//!                                 DelphiCoordinator
//!                            (session history + metrics)
//! ```
//!
//! Everything here is pure, synchronous, in-memory computation with
//! bounded cost per round: O(P²·N) for similarity and clustering,
//! O(P·A) for disagreement analysis. Numeric edge cases degrade to
//! defined sentinel values; only structural caller bugs error.

pub mod analyzer;
pub mod clusters;
pub mod delphi;
pub mod disagreement;
pub mod encoder;
pub mod scorer;
pub mod similarity;
mod stats;
pub mod voting;

// Re-export main types
pub use analyzer::{
    CompromiseSuggestion, ConsensusAnalyzer, DEFAULT_MIN_CONSENSUS, DiscussionAnalysis,
    ExpectedImpact, NextStep, ResolutionApproach,
};
pub use clusters::{ClusterDetector, DEFAULT_SIMILARITY_THRESHOLD, OpinionCluster};
pub use delphi::{
    DelphiCoordinator, DiscussionSession, RoundMetrics, RoundResult, SessionMetrics,
};
pub use disagreement::{
    Disagreement, DisagreementAnalyzer, DisagreementThresholds, ResolutionRationale,
    SeverityWeights, SuggestedResolution,
};
pub use encoder::{PositionEncoder, PositionVector, aspect_scalar};
pub use scorer::{ConsensusScorer, ScoreWeights};
pub use similarity::{SimilarityMatrix, cosine};
pub use voting::{
    RoleWeights, SchemeImportance, TieBreak, WeightScheme, WeightTable, WeightedDecision,
    WeightedVoteAggregator,
};
