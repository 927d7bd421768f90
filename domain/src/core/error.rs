//! Domain error types

use thiserror::Error;

/// Structural contract violations surfaced by the consensus engine.
///
/// Numeric edge cases (empty rounds, degenerate vectors, zero total weight)
/// never error; they resolve to defined sentinel values. An `EngineError`
/// always indicates a caller bug and is not retried or recovered locally.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Vote cast by '{0}' who has no evaluation record in this round")]
    UnknownVoter(String),

    #[error("Duplicate evaluation record for participant '{0}'")]
    DuplicateParticipant(String),
}
