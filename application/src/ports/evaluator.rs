//! Evaluator port
//!
//! Defines the capability interface for the collaborators that actually
//! form opinions. The engine depends only on this trait, never on
//! concrete role types; whether an implementation is a scripted replay,
//! a panel of humans, or a generative model behind a retrying client is
//! invisible from here.

use async_trait::async_trait;
use consilium_domain::{DiscussionAnalysis, EvaluationRecord, Proposal, VoteRecord};
use thiserror::Error;

/// Errors an evaluator collaborator can surface
///
/// Retries and backoff around a remote backend are the implementation's
/// responsibility; by the time an error reaches the engine it is final
/// for this round. A failed evaluator is skipped, not retried here.
#[derive(Error, Debug)]
pub enum EvaluatorError {
    #[error("Evaluator unavailable: {0}")]
    Unavailable(String),

    #[error("Evaluation failed: {0}")]
    Failed(String),
}

/// A board participant capable of evaluating and voting on a proposal
///
/// Implementations live outside the engine (the CLI ships a scripted
/// replay adapter). One instance represents one seat at the table.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// The participant identifier this evaluator answers as
    fn role(&self) -> &str;

    /// Produce a structured evaluation of the proposal for one round
    async fn evaluate(
        &self,
        proposal: &Proposal,
        round: u32,
    ) -> Result<EvaluationRecord, EvaluatorError>;

    /// Cast a categorical vote, given the round's consensus analysis
    async fn vote(
        &self,
        proposal: &Proposal,
        round: u32,
        analysis: &DiscussionAnalysis,
    ) -> Result<VoteRecord, EvaluatorError>;
}
