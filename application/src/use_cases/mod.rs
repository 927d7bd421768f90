//! Use cases

pub mod run_round;

pub use run_round::{RunRoundError, RunRoundInput, RunRoundUseCase};
