//! Progress notification port
//!
//! Defines the interface for reporting progress while a round runs.

use serde::{Deserialize, Serialize};

/// Phase of one deliberation round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Participants are evaluating the proposal
    Evaluation,
    /// Participants are casting votes
    Voting,
}

impl RoundPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::Evaluation => "evaluation",
            RoundPhase::Voting => "voting",
        }
    }
}

/// Callback for progress updates during a deliberation round
///
/// Implementations live in the host binary and can display progress in
/// various ways (console, web UI, etc.)
pub trait DeliberationProgress: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: RoundPhase, total: usize);

    /// Called when one participant finishes a phase
    fn on_participant_done(&self, phase: RoundPhase, role: &str, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: RoundPhase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DeliberationProgress for NoProgress {
    fn on_phase_start(&self, _phase: RoundPhase, _total: usize) {}
    fn on_participant_done(&self, _phase: RoundPhase, _role: &str, _success: bool) {}
    fn on_phase_complete(&self, _phase: RoundPhase) {}
}
