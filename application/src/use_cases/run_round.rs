//! Run Round use case
//!
//! Orchestrates one full deliberation round: fan out evaluation requests
//! to every seated evaluator, analyze the collected records, gather
//! votes, and assemble the round result. The caller owns the
//! [`DelphiCoordinator`](consilium_domain::DelphiCoordinator) and decides
//! whether another round runs.

use crate::config::ConsensusConfig;
use crate::ports::evaluator::Evaluator;
use crate::ports::progress::{DeliberationProgress, NoProgress, RoundPhase};
use consilium_domain::{
    ConsensusAnalyzer, EngineError, EvaluationRecord, PositionVector, Proposal, RoundResult,
    VoteRecord, WeightedVoteAggregator,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that can occur while running a round
#[derive(Error, Debug)]
pub enum RunRoundError {
    #[error("No evaluators seated at the board")]
    NoEvaluators,

    #[error("All evaluators failed to produce a record")]
    AllEvaluatorsFailed,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Input for the RunRound use case
#[derive(Debug, Clone)]
pub struct RunRoundInput {
    /// The proposal under deliberation
    pub proposal: Proposal,
    /// Round number (1-indexed)
    pub round: u32,
}

impl RunRoundInput {
    pub fn new(proposal: Proposal, round: u32) -> Self {
        Self { proposal, round }
    }
}

/// Use case for running one deliberation round
pub struct RunRoundUseCase {
    evaluators: Vec<Arc<dyn Evaluator>>,
    analyzer: ConsensusAnalyzer,
    aggregator: WeightedVoteAggregator,
}

impl RunRoundUseCase {
    pub fn new(evaluators: Vec<Arc<dyn Evaluator>>, config: &ConsensusConfig) -> Self {
        Self {
            evaluators,
            analyzer: config.analyzer(),
            aggregator: config.aggregator(),
        }
    }

    /// Number of evaluators seated at the board
    pub fn seated(&self) -> usize {
        self.evaluators.len()
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunRoundInput) -> Result<RoundResult, RunRoundError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunRoundInput,
        progress: &dyn DeliberationProgress,
    ) -> Result<RoundResult, RunRoundError> {
        if self.evaluators.is_empty() {
            return Err(RunRoundError::NoEvaluators);
        }

        info!(
            round = input.round,
            evaluators = self.evaluators.len(),
            "Starting deliberation round"
        );

        // Phase 1: gather evaluations from all seats in parallel
        let records = self.phase_evaluate(&input, progress).await;
        if records.is_empty() {
            return Err(RunRoundError::AllEvaluatorsFailed);
        }

        // Phase 2: the engine measures the round (pure, synchronous)
        let analysis = self.analyzer.analyze(&records);
        debug!(
            consensus_score = analysis.consensus_score,
            clusters = analysis.opinion_clusters.len(),
            disagreements = analysis.key_disagreements.len(),
            "Round analyzed"
        );

        // Phase 3: ballots, only for seats that produced a record
        let votes = self.phase_vote(&input, &records, &analysis, progress).await;

        let decision = self.aggregator.aggregate(&votes, &records)?;
        info!(
            decision = %decision.decision,
            confidence = decision.confidence,
            "Round decided"
        );

        let positions: BTreeMap<String, PositionVector> = records
            .iter()
            .map(|r| (r.participant.clone(), self.analyzer.encoder().encode(r)))
            .collect();

        Ok(RoundResult::new(
            input.round,
            analysis,
            decision,
            positions,
            votes,
        ))
    }

    /// Fan evaluation requests out over all evaluators
    async fn phase_evaluate(
        &self,
        input: &RunRoundInput,
        progress: &dyn DeliberationProgress,
    ) -> Vec<EvaluationRecord> {
        progress.on_phase_start(RoundPhase::Evaluation, self.evaluators.len());

        let mut join_set = JoinSet::new();
        for evaluator in &self.evaluators {
            let evaluator = Arc::clone(evaluator);
            let proposal = input.proposal.clone();
            let round = input.round;

            join_set.spawn(async move {
                let result = evaluator.evaluate(&proposal, round).await;
                (evaluator.role().to_string(), result)
            });
        }

        let mut records = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((role, Ok(record))) => {
                    debug!(role, "Evaluation received");
                    progress.on_participant_done(RoundPhase::Evaluation, &role, true);
                    records.push(record);
                }
                Ok((role, Err(e))) => {
                    warn!(role, error = %e, "Evaluator failed; skipping for this round");
                    progress.on_participant_done(RoundPhase::Evaluation, &role, false);
                }
                Err(e) => {
                    warn!(error = %e, "Evaluation task join error");
                }
            }
        }

        // Join order is racy; settle on participant order for determinism
        records.sort_by(|a, b| a.participant.cmp(&b.participant));
        progress.on_phase_complete(RoundPhase::Evaluation);
        records
    }

    /// Collect ballots from the evaluators that produced a record
    async fn phase_vote(
        &self,
        input: &RunRoundInput,
        records: &[EvaluationRecord],
        analysis: &consilium_domain::DiscussionAnalysis,
        progress: &dyn DeliberationProgress,
    ) -> Vec<VoteRecord> {
        let voters: Vec<&Arc<dyn Evaluator>> = self
            .evaluators
            .iter()
            .filter(|e| records.iter().any(|r| r.participant == e.role()))
            .collect();
        progress.on_phase_start(RoundPhase::Voting, voters.len());

        let mut join_set = JoinSet::new();
        for evaluator in voters {
            let evaluator = Arc::clone(evaluator);
            let proposal = input.proposal.clone();
            let analysis = analysis.clone();
            let round = input.round;

            join_set.spawn(async move {
                let result = evaluator.vote(&proposal, round, &analysis).await;
                (evaluator.role().to_string(), result)
            });
        }

        let mut votes = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((role, Ok(vote))) => {
                    debug!(role, choice = %vote.choice, "Ballot received");
                    progress.on_participant_done(RoundPhase::Voting, &role, true);
                    votes.push(vote);
                }
                Ok((role, Err(e))) => {
                    warn!(role, error = %e, "Evaluator declined to vote");
                    progress.on_participant_done(RoundPhase::Voting, &role, false);
                }
                Err(e) => {
                    warn!(error = %e, "Voting task join error");
                }
            }
        }

        votes.sort_by(|a, b| a.participant.cmp(&b.participant));
        progress.on_phase_complete(RoundPhase::Voting);
        votes
    }
}
