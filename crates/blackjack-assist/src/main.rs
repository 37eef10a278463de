use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{Level, event};

use blackjack_assist::actuator::{open_device, run_probe};
use blackjack_assist::app;
use blackjack_assist::config::{ActuatorConfig, BlackjackConfig, ConfigError, Mode};
use blackjack_assist::logging::init_logging;
use blackjack_assist::report::OutputFormat;

/// HiLo card-counting assistant for a camera-watched blackjack table.
#[derive(Debug, Parser)]
#[command(
    name = "blackjack-assist",
    author,
    version,
    about = "Scan the table, count HiLo, recommend bet and action"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "assist.yaml")]
    config: PathBuf,

    /// Override the front end (interactive or batch).
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Override the scan window length in seconds.
    #[arg(long, value_name = "SECS")]
    scan_secs: Option<f64>,

    /// Override the estimated decks remaining in the shoe.
    #[arg(long, value_name = "DECKS")]
    decks: Option<f64>,

    /// Relay commands to this serial device (enables the actuator).
    #[arg(long, value_name = "DEVICE")]
    port: Option<PathBuf>,

    /// Override the batch round limit (0 = until the feed ends).
    #[arg(long, value_name = "ROUNDS")]
    rounds: Option<u32>,

    /// Status output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Exit after validating the configuration (no session is run).
    #[arg(long)]
    validate_only: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send typed lines straight to the actuator to check the wiring.
    Probe,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BlackjackConfig::load(&cli.config)?;

    if let Some(mode) = cli.mode {
        config.mode = mode;
    }

    if let Some(secs) = cli.scan_secs {
        config.scan.duration_secs = secs;
    }

    if let Some(decks) = cli.decks {
        config.count.decks_remaining = decks;
    }

    if let Some(port) = cli.port {
        match config.actuator.as_mut() {
            Some(actuator) => actuator.port = port,
            None => config.actuator = Some(ActuatorConfig::new(port)),
        }
    }

    if let Some(rounds) = cli.rounds {
        config.batch.rounds = rounds;
    }

    config
        .validate()
        .map_err(|source| ConfigError::Invalid {
            path: cli.config.clone(),
            source,
        })?;

    let logging_guard = init_logging(&config.logging)?;

    if cli.format == OutputFormat::Text {
        println!(
            "Loaded configuration from {} ({:?} mode, {} deck{} remaining, {}s scans)",
            cli.config.display(),
            config.mode,
            config.count.decks_remaining,
            if config.count.decks_remaining == 1.0 { "" } else { "s" },
            config.scan.duration_secs
        );
    }

    if cli.validate_only {
        println!("Validation-only mode: session skipped.");
        return Ok(());
    }

    if let Some(Command::Probe) = cli.command {
        let actuator = config
            .actuator
            .as_ref()
            .context("probe needs an actuator port (set actuator.port or pass --port)")?;
        let mut sink = open_device(actuator)?;
        let summary = run_probe(io::stdin().lock(), io::stdout(), &mut sink)
            .context("relaying probe input")?;
        println!(
            "Probe finished: {} sent, {} failed",
            summary.sent, summary.failed
        );
        return Ok(());
    }

    let summary = app::run(&config, cli.format)?;
    event!(
        target: "blackjack_assist",
        Level::DEBUG,
        frames = summary.frames,
        exit = ?summary.exit,
        "session finished"
    );
    if let Some(path) = logging_guard.telemetry_path.as_ref() {
        if cli.format == OutputFormat::Text {
            println!("Telemetry log: {}", path.display());
        }
    }

    Ok(())
}
