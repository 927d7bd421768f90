//! Round analysis facade
//!
//! Runs the scorer, the cluster detector, and the disagreement analyzer
//! over one round's records and derives the moderator-facing extras:
//! recommended next steps when consensus is short, and compromise
//! suggestions for each disputed aspect.

use super::clusters::{ClusterDetector, OpinionCluster};
use super::disagreement::{Disagreement, DisagreementAnalyzer};
use super::encoder::{PositionEncoder, PositionVector};
use super::scorer::ConsensusScorer;
use crate::evaluation::{AspectCatalog, EvaluationRecord};
use serde::{Deserialize, Serialize};

/// Mean aspect score above which a participant counts as backing an aspect
const SUPPORT_THRESHOLD: f64 = 0.6;

/// Consensus score below which the analysis recommends next steps
pub const DEFAULT_MIN_CONSENSUS: f64 = 0.7;

/// How a disagreement should be worked on, by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionApproach {
    /// Severe splits earn their own session
    DedicatedSession,
    /// Mid-grade splits get written position clarifications
    WrittenClarifications,
    /// Mild splits are handled in regular discussion
    RegularDiscussion,
}

impl ResolutionApproach {
    pub fn from_severity(severity: f64) -> Self {
        if severity > 0.8 {
            ResolutionApproach::DedicatedSession
        } else if severity > 0.5 {
            ResolutionApproach::WrittenClarifications
        } else {
            ResolutionApproach::RegularDiscussion
        }
    }
}

impl std::fmt::Display for ResolutionApproach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ResolutionApproach::DedicatedSession => "Schedule dedicated discussion session",
            ResolutionApproach::WrittenClarifications => "Request written position clarifications",
            ResolutionApproach::RegularDiscussion => "Address during regular discussion",
        };
        write!(f, "{}", text)
    }
}

/// A recommended action for moving the group toward consensus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NextStep {
    /// Work on one specific disputed aspect
    AddressDisagreement {
        aspect: String,
        severity: f64,
        approach: ResolutionApproach,
    },
    /// Request detailed explanations of positions
    ClarifyPositions,
    /// Focus discussion on areas of agreement
    IdentifyCommonGround,
    /// Propose potential compromise solutions
    ExploreCompromises,
}

/// Expected impact of settling one compromise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedImpact {
    High,
    Medium,
}

/// A concrete compromise proposal for one disputed aspect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompromiseSuggestion {
    /// The disputed aspect
    pub aspect: String,
    /// Human-readable summary for the minutes
    pub description: String,
    /// Participants already backing the aspect (mean score above 0.6)
    pub supporting_participants: Vec<String>,
    /// High when the underlying disagreement is severe
    pub expected_impact: ExpectedImpact,
    /// Share of participants already backing the aspect
    pub acceptance_likelihood: f64,
}

/// Everything the engine can say about one round of evaluations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionAnalysis {
    /// Composite agreement measure in [0, 1]
    pub consensus_score: f64,
    /// Clusters of aligned opinion
    pub opinion_clusters: Vec<OpinionCluster>,
    /// Ranked disagreements
    pub key_disagreements: Vec<Disagreement>,
    /// Recommended actions (empty once consensus clears the threshold)
    pub next_steps: Vec<NextStep>,
    /// Compromise proposals, one per disagreement
    pub suggested_compromises: Vec<CompromiseSuggestion>,
}

/// One-stop analysis over a round's evaluation records.
///
/// Owns the component analytics and keeps them on a single shared aspect
/// catalog so their views of the round can never disagree.
#[derive(Debug, Clone)]
pub struct ConsensusAnalyzer {
    encoder: PositionEncoder,
    scorer: ConsensusScorer,
    clusters: ClusterDetector,
    disagreements: DisagreementAnalyzer,
    min_consensus: f64,
}

impl ConsensusAnalyzer {
    pub fn new(catalog: AspectCatalog) -> Self {
        Self {
            encoder: PositionEncoder::new(catalog.clone()),
            scorer: ConsensusScorer::new(),
            clusters: ClusterDetector::new(),
            disagreements: DisagreementAnalyzer::new(catalog),
            min_consensus: DEFAULT_MIN_CONSENSUS,
        }
    }

    pub fn with_scorer(mut self, scorer: ConsensusScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_cluster_detector(mut self, clusters: ClusterDetector) -> Self {
        self.clusters = clusters;
        self
    }

    pub fn with_disagreement_analyzer(mut self, disagreements: DisagreementAnalyzer) -> Self {
        self.disagreements = disagreements;
        self
    }

    pub fn with_min_consensus(mut self, min_consensus: f64) -> Self {
        self.min_consensus = min_consensus;
        self
    }

    /// The encoder this analyzer measures positions with
    pub fn encoder(&self) -> &PositionEncoder {
        &self.encoder
    }

    /// Encode the round's records in input order
    pub fn encode_positions(&self, records: &[EvaluationRecord]) -> Vec<PositionVector> {
        self.encoder.encode_all(records)
    }

    /// Analyze one round of evaluation records.
    ///
    /// Never fails: an empty round produces a zero score and empty lists.
    pub fn analyze(&self, records: &[EvaluationRecord]) -> DiscussionAnalysis {
        let vectors = self.encode_positions(records);
        let participants: Vec<String> =
            records.iter().map(|r| r.participant.clone()).collect();

        let consensus_score = self.scorer.score(&vectors);
        let opinion_clusters = self.clusters.detect(&vectors, &participants);
        let key_disagreements = self.disagreements.analyze(records);

        let next_steps = if consensus_score < self.min_consensus {
            Self::next_steps(&key_disagreements)
        } else {
            Vec::new()
        };
        let suggested_compromises = Self::compromises(records, &key_disagreements);

        DiscussionAnalysis {
            consensus_score,
            opinion_clusters,
            key_disagreements,
            next_steps,
            suggested_compromises,
        }
    }

    fn next_steps(disagreements: &[Disagreement]) -> Vec<NextStep> {
        let mut steps: Vec<NextStep> = disagreements
            .iter()
            .map(|d| NextStep::AddressDisagreement {
                aspect: d.aspect.clone(),
                severity: d.severity,
                approach: ResolutionApproach::from_severity(d.severity),
            })
            .collect();
        steps.extend([
            NextStep::ClarifyPositions,
            NextStep::IdentifyCommonGround,
            NextStep::ExploreCompromises,
        ]);
        steps
    }

    fn compromises(
        records: &[EvaluationRecord],
        disagreements: &[Disagreement],
    ) -> Vec<CompromiseSuggestion> {
        disagreements
            .iter()
            .map(|d| {
                let supporting_participants: Vec<String> = records
                    .iter()
                    .filter(|r| {
                        r.aspect_mean(&d.aspect)
                            .is_some_and(|mean| mean > SUPPORT_THRESHOLD)
                    })
                    .map(|r| r.participant.clone())
                    .collect();
                let acceptance_likelihood = if records.is_empty() {
                    0.5
                } else {
                    supporting_participants.len() as f64 / records.len() as f64
                };
                CompromiseSuggestion {
                    aspect: d.aspect.clone(),
                    description: format!("Find middle ground on {}", d.aspect),
                    supporting_participants,
                    expected_impact: if d.severity > 0.7 {
                        ExpectedImpact::High
                    } else {
                        ExpectedImpact::Medium
                    },
                    acceptance_likelihood,
                }
            })
            .collect()
    }
}
