//! Reveal CLI
//!
//! Runs JSON scroll scenarios against the reveal engine without a browser:
//! - `reveal run` replays a scenario and reports the first failed assertion
//! - `reveal plan` prints what a scene would animate
//! - `reveal init` writes a default reveal.toml

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reveal_app::{plan_scenario, run_loaded_scenario, HeadlessScenario};
use reveal_core::Scene;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{RevealConfig, CONFIG_FILE};

/// Headless runner for scroll-synchronized reveal animations
#[derive(Parser, Debug)]
#[command(name = "reveal")]
#[command(about = "Run and plan headless scroll-reveal scenarios")]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scenario and check its assertions
    Run {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Configuration file (defaults to ./reveal.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the JSON report to this relative path instead of stdout
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Override the logical frame interval
        #[arg(long)]
        tick_ms: Option<u64>,
    },

    /// Print sections, stagger delays, ambient layers and counters as JSON
    Plan {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Configuration file (defaults to ./reveal.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a default reveal.toml into the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Run {
            scenario,
            config,
            report,
            tick_ms,
        } => cmd_run(scenario, config, report, tick_ms),
        Command::Plan { scenario, config } => cmd_plan(scenario, config),
        Command::Init { force } => cmd_init(force),
    }
}

fn cmd_run(
    scenario_path: PathBuf,
    config_path: Option<PathBuf>,
    report_path: Option<PathBuf>,
    tick_ms: Option<u64>,
) -> Result<ExitCode> {
    let config = RevealConfig::load(config_path.as_deref())?;
    let mut headless = config.headless;
    if let Some(tick_ms) = tick_ms {
        headless.tick_ms = tick_ms;
    }

    let scenario = HeadlessScenario::from_path(&scenario_path)?;
    if !scenario.has_assertions() {
        warn!(scenario = %scenario_path.display(), "scenario has no assertions");
    }
    info!(
        scenario = %scenario_path.display(),
        steps = scenario.steps.len(),
        "running scenario"
    );

    let outcome = run_loaded_scenario(&scenario, headless, config.engine)
        .with_context(|| format!("failed to run {}", scenario_path.display()))?;

    match report_path {
        Some(path) => {
            outcome.report().write_to_path(&path)?;
            info!(report = %path.display(), "wrote report");
        }
        None => outcome.report().write_to_writer(&mut std::io::stdout().lock())?,
    }

    Ok(if outcome.is_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn cmd_plan(scenario_path: PathBuf, config_path: Option<PathBuf>) -> Result<ExitCode> {
    let config = RevealConfig::load(config_path.as_deref())?;
    let scenario = HeadlessScenario::from_path(&scenario_path)?;
    let engine = scenario.engine.clone().unwrap_or(config.engine);

    let plan = plan_scenario(&Scene::new(scenario.scene), &engine)?;
    println!("{}", plan.to_json()?);
    Ok(ExitCode::SUCCESS)
}

fn cmd_init(force: bool) -> Result<ExitCode> {
    let path = PathBuf::from(CONFIG_FILE);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", CONFIG_FILE);
    }

    fs::write(&path, RevealConfig::default().to_toml()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Created {}", path.display());
    Ok(ExitCode::SUCCESS)
}
