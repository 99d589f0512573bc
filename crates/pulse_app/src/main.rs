//! Pulse CLI
//!
//! Renders the survey dashboards to SVG and runs headless interaction scenarios.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pulse_app::render::render_all;
use pulse_app::{
    run_loaded_scenario, ExerciseDashboard, HeadlessRunConfig, HeadlessScenario, Phase,
    PulseConfig,
};

#[derive(Parser)]
#[command(name = "pulse")]
#[command(author, version, about = "Survey dashboards: render views and run scripted interactions")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to pulse.toml, or a directory containing one
    #[arg(short, long, global = true, default_value = ".")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every view to SVG
    Render {
        /// Output directory (overrides the config)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Run a headless scenario against the exercise dashboard
    Run {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Write the JSON report here (relative path); stdout otherwise
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Logical milliseconds per frame
        #[arg(long, default_value_t = 16)]
        tick_ms: u64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = PulseConfig::load(&cli.config)?;

    match cli.command {
        Commands::Render { out } => {
            if let Some(out) = out {
                config.output.dir = out;
            }
            let written = render_all(&config)?;
            tracing::info!(
                "rendered {} views into {}",
                written.len(),
                config.output.dir.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run {
            scenario,
            report,
            tick_ms,
        } => {
            let scenario = HeadlessScenario::from_path(&scenario)?;
            let mut dashboard = ExerciseDashboard::new(config.exercise.clone())?;
            dashboard.load_path(&config.data.exercise)?;
            if let Phase::Failed(reason) = dashboard.phase() {
                anyhow::bail!("exercise survey unavailable: {reason}");
            }

            let runtime = HeadlessRunConfig {
                tick_ms,
                ..HeadlessRunConfig::default()
            };
            let outcome =
                run_loaded_scenario(&mut dashboard, &scenario, runtime, &config.output.dir)?;
            match report {
                Some(path) => outcome.report().write_to_path(&path)?,
                None => outcome.report().write_to_writer(&mut std::io::stdout())?,
            }

            if outcome.is_failed() {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
