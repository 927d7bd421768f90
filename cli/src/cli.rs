//! Command line interface definition

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the deliberation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Per-round detail plus the session metrics table
    Full,
    /// One line per round plus the final decision
    Summary,
    /// The complete session history as JSON
    Json,
}

/// Consilium - consensus analytics for board-style deliberation
///
/// Replays a scripted deliberation session: the script supplies the
/// proposal and, per participant, the evaluations and votes for each
/// round. The engine measures consensus, clusters opinions, ranks
/// disagreements, and aggregates the weighted vote round by round.
#[derive(Debug, Parser)]
#[command(name = "consilium", version, about)]
pub struct Cli {
    /// Path to the session script (JSON)
    #[arg(short, long)]
    pub script: PathBuf,

    /// Path to a TOML config file (merged over built-in defaults,
    /// then CONSILIUM_* environment variables)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Stop as soon as a round reaches the configured consensus score
    #[arg(long)]
    pub stop_at_consensus: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
