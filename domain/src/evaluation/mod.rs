//! Evaluation inputs
//!
//! This module defines the raw material the consensus engine works on:
//! the canonical aspect catalog, per-participant evaluation records with
//! arbitrarily nested score payloads, and categorical vote records.
//!
//! The engine treats evaluation payloads as opaque structured data. The
//! only interpretation it ever applies is the unit-score extraction rule
//! in [`record`]: recursively collect numeric leaves within `[0, 1]`.

pub mod aspects;
pub mod record;
pub mod vote;

pub use aspects::AspectCatalog;
pub use record::EvaluationRecord;
pub use vote::{VoteChoice, VoteRecord, VoteTally};

/// Neutral fallback score used wherever a participant supplied no usable
/// value for an aspect.
///
/// Shared by position encoding and disagreement analysis so the two can
/// never drift apart.
pub const NEUTRAL_SCORE: f64 = 0.5;
