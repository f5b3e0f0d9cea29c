use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;

use pagefx_cli::runner::RunOptions;
use pagefx_cli::{report, runner, scenario};

#[derive(Parser)]
#[command(name = "pagefx")]
#[command(about = "Replay interaction scenarios against a modeled page", long_about = None)]
struct Cli {
    /// Log at debug level instead of warnings only
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a scenario file and print what the page did
    Run {
        /// Path to the scenario JSON file
        scenario: PathBuf,

        /// Skip wall-clock waits between steps
        #[arg(long)]
        fast: bool,

        /// Emit the report as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
    /// Write the bundled sample scenario to disk
    Sample {
        /// Destination path
        #[arg(long, default_value = "walkthrough.json")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run {
            scenario: path,
            fast,
            json,
        } => {
            let scenario = scenario::Scenario::load(&path)?;
            let report = runner::run(&scenario, &RunOptions { fast }).await?;
            if json {
                println!("{}", report::to_json(&report)?);
            } else {
                report::print_human(&report);
            }
        }
        Command::Sample { out } => {
            let sample = scenario::sample();
            let raw = serde_json::to_string_pretty(&sample)
                .context("Failed to serialize sample scenario")?;
            std::fs::write(&out, raw)
                .with_context(|| format!("Failed to write scenario to {}", out.display()))?;
            println!(
                "{} {}",
                style("Sample scenario written to").green(),
                out.display()
            );
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
