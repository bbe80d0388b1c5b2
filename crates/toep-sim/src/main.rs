use std::path::PathBuf;

use clap::Parser;

use toep_sim::config::{ResolvedOutputs, SimConfig};
use toep_sim::logging::init_logging;
use toep_sim::selfplay::SelfPlayRunner;

/// Seeded self-play harness for the Toep engine.
#[derive(Debug, Parser)]
#[command(
    name = "toep-sim",
    author,
    version,
    about = "Deterministic Toep self-play harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "sim/selfplay.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the RNG seed for match generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the number of matches to play.
    #[arg(long, value_name = "MATCHES")]
    matches: Option<usize>,

    /// Override the number of seats at the table.
    #[arg(long, value_name = "SEATS")]
    seats: Option<usize>,

    /// Exit after validating the configuration (no matches are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(seed) = cli.seed {
        config.table.seed = Some(seed);
    }

    if let Some(matches) = cli.matches {
        config.table.matches = matches;
    }

    if let Some(seats) = cli.seats {
        config.table.seats = seats;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let seats = config.table.seats;
    let matches = config.table.matches;

    println!(
        "Loaded configuration '{run_id}' with {seats} seats ({matches} match{})",
        if matches == 1 { "" } else { "es" }
    );

    let runner = SelfPlayRunner::new(config.clone(), outputs.clone())?;

    if cli.validate_only {
        println!("Validation-only mode: self-play skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let summary = runner.run()?;
    println!(
        "Self-play complete for '{run_id}': {} matches ({} truncated) -> {} rows at {}",
        summary.matches_played,
        summary.truncated,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Engine trace: {}", guard.trace_path.display());
    }

    Ok(())
}
