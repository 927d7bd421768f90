//! Ports (interfaces) to the world outside the engine

pub mod evaluator;
pub mod progress;

pub use evaluator::{Evaluator, EvaluatorError};
pub use progress::{DeliberationProgress, NoProgress, RoundPhase};
