//! Console report formatting

use chrono::{DateTime, Utc};
use colored::Colorize;
use consilium_application::{DeliberationProgress, RoundPhase};
use consilium_domain::{DiscussionSession, RoundResult, SessionMetrics};
use std::fmt::Write as _;

/// Formats deliberation results for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Full per-round report
    pub fn format_round(result: &RoundResult) -> String {
        let mut out = String::new();
        let when = DateTime::<Utc>::from_timestamp_millis(result.timestamp as i64)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_default();

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            format!("=== Round {} ({}) ===", result.round, when).bold()
        );

        let score = result.consensus_score();
        let score_text = format!("{:.3}", score);
        let colored_score = if score >= 0.7 {
            score_text.green()
        } else if score >= 0.4 {
            score_text.yellow()
        } else {
            score_text.red()
        };
        let _ = writeln!(out, "Consensus score: {}", colored_score);

        let _ = writeln!(out, "\n{}", "Opinion clusters".underline());
        for cluster in &result.analysis.opinion_clusters {
            let _ = writeln!(
                out,
                "  #{} [{}] cohesion {:.2}",
                cluster.id,
                cluster.members.join(", "),
                cluster.cohesion
            );
        }

        if !result.analysis.key_disagreements.is_empty() {
            let _ = writeln!(out, "\n{}", "Key disagreements".underline());
            for disagreement in result.analysis.key_disagreements.iter().take(3) {
                let _ = writeln!(
                    out,
                    "  {} (severity {:.3}) - {} toward {:.2}",
                    disagreement.aspect.as_str().yellow(),
                    disagreement.severity,
                    disagreement.resolution.rationale,
                    disagreement.resolution.target
                );
            }
        }

        let decision = &result.decision;
        let decision_text = decision.decision.to_string().to_uppercase();
        let colored_decision = match decision.decision {
            consilium_domain::VoteChoice::Support => decision_text.green(),
            consilium_domain::VoteChoice::Oppose => decision_text.red(),
            consilium_domain::VoteChoice::Abstain => decision_text.yellow(),
        };
        let _ = writeln!(
            out,
            "\nWeighted decision: {} (confidence {:.2}) {}",
            colored_decision,
            decision.confidence,
            consilium_domain::VoteTally::summary(&result.votes)
        );

        out
    }

    /// One-line summary for a round
    pub fn format_round_summary(result: &RoundResult) -> String {
        format!(
            "Round {}: consensus {:.3}, {} clusters, {} disagreements, decision {}",
            result.round,
            result.consensus_score(),
            result.analysis.opinion_clusters.len(),
            result.analysis.key_disagreements.len(),
            result.decision.decision
        )
    }

    /// Session metrics table
    pub fn format_metrics(metrics: &SessionMetrics) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n{}", "Session metrics".bold());
        let _ = writeln!(
            out,
            "  {:>5}  {:>12}  {:>9}  {:>9}  {:>13}",
            "round", "convergence", "stability", "diversity", "participation"
        );
        for round in &metrics.rounds {
            let _ = writeln!(
                out,
                "  {:>5}  {:>12}  {:>9}  {:>9.3}  {:>13.2}",
                round.round,
                round
                    .convergence
                    .map(|c| format!("{:+.4}", c))
                    .unwrap_or_else(|| "-".to_string()),
                round
                    .stability
                    .map(|s| format!("{:.2}", s))
                    .unwrap_or_else(|| "-".to_string()),
                round.diversity,
                round.participation
            );
        }
        out
    }

    /// The whole session as pretty JSON, for the archival consumer
    pub fn format_json(
        session: &DiscussionSession,
        metrics: &SessionMetrics,
    ) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(&serde_json::json!({
            "rounds": session.rounds(),
            "metrics": metrics,
        }))?)
    }
}

/// Prints phase progress while a round runs
pub struct ProgressReporter;

impl DeliberationProgress for ProgressReporter {
    fn on_phase_start(&self, phase: RoundPhase, total: usize) {
        println!("{} ({} participants)...", phase.as_str(), total);
    }

    fn on_participant_done(&self, _phase: RoundPhase, role: &str, success: bool) {
        let mark = if success { "+".green() } else { "x".red() };
        println!("  [{}] {}", mark, role);
    }

    fn on_phase_complete(&self, _phase: RoundPhase) {}
}
