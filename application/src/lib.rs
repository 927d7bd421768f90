//! Application layer for consilium
//!
//! Use cases and ports around the consensus engine. The engine itself is
//! pure and synchronous; everything concurrent - fanning evaluation
//! requests out to the seated evaluators and collecting their ballots -
//! happens here, before the engine is invoked.
//!
//! The [`Evaluator`] port is the seam to the outside world: concrete
//! implementations (scripted replays, generative backends, humans) live
//! in host binaries and adapters, never in this crate.

pub mod config;
pub mod ports;
pub mod use_cases;

pub use config::ConsensusConfig;
pub use ports::{DeliberationProgress, Evaluator, EvaluatorError, NoProgress, RoundPhase};
pub use use_cases::{RunRoundError, RunRoundInput, RunRoundUseCase};
