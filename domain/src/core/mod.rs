//! Core value objects and errors shared across the domain

pub mod error;
pub mod proposal;

pub use error::EngineError;
pub use proposal::Proposal;
