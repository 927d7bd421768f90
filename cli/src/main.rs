//! CLI entrypoint for consilium
//!
//! Wires the layers together: loads configuration, builds scripted
//! evaluators from the session script, runs the deliberation rounds, and
//! prints the report. Deciding when to stop is this orchestrator's job,
//! never the engine's.

mod cli;
mod config_loader;
mod report;
mod script;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, OutputFormat};
use config_loader::load_config;
use consilium_application::{RunRoundInput, RunRoundUseCase};
use report::{ConsoleFormatter, ProgressReporter};
use script::SessionScript;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = load_config(cli.config.as_deref()).context("loading configuration")?;
    let script = SessionScript::load(&cli.script)
        .with_context(|| format!("loading session script {}", cli.script.display()))?;

    let proposal = script.proposal.clone();
    let total_rounds = script.round_count();
    info!(
        proposal = %proposal,
        participants = script.participants.len(),
        rounds = total_rounds,
        "Starting deliberation"
    );

    if !cli.quiet && cli.output != OutputFormat::Json {
        println!();
        println!("Proposal: {}", proposal.title());
        println!(
            "Participants: {}",
            script
                .participants
                .iter()
                .map(|p| p.role.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let use_case = RunRoundUseCase::new(script.evaluators(), &config);
    let mut coordinator = config.coordinator(use_case.seated());

    for round in 1..=total_rounds {
        let input = RunRoundInput::new(proposal.clone(), round);
        let result = if cli.quiet || cli.output == OutputFormat::Json {
            use_case.execute(input).await?
        } else {
            use_case
                .execute_with_progress(input, &ProgressReporter)
                .await?
        };

        match cli.output {
            OutputFormat::Full => print!("{}", ConsoleFormatter::format_round(&result)),
            OutputFormat::Summary => {
                println!("{}", ConsoleFormatter::format_round_summary(&result))
            }
            OutputFormat::Json => {}
        }

        let reached = result.consensus_score() >= config.min_consensus;
        coordinator.record_round(result);

        if cli.stop_at_consensus && reached {
            info!(round, "Consensus threshold reached; stopping early");
            break;
        }
    }

    let metrics = coordinator.session_metrics();
    match cli.output {
        OutputFormat::Json => {
            println!(
                "{}",
                ConsoleFormatter::format_json(coordinator.session(), &metrics)?
            );
        }
        _ => print!("{}", ConsoleFormatter::format_metrics(&metrics)),
    }

    Ok(())
}
