use std::io::{self, BufReader, Write};

use anyhow::{Context, Result};
use blackjack_engine::{
    ActuatorSink, AutoScan, CountEngine, Operator, ScanMachine, Session, SessionSummary,
};
use tracing::{Level, event};

use crate::actuator::open_device;
use crate::config::{BlackjackConfig, Mode};
use crate::feed::{RecordedClassifier, RecordedFeed};
use crate::operator::Console;
use crate::report::{OutputFormat, StatusReporter};

/// Runs one session on stdin/stdout in the configured mode.
pub fn run(config: &BlackjackConfig, format: OutputFormat) -> Result<SessionSummary> {
    let summary = match config.mode {
        Mode::Interactive => {
            let console = Console::new(BufReader::new(io::stdin()), io::stdout());
            run_session(config, console, io::stdout(), format)?.0
        }
        Mode::Batch => {
            let operator = AutoScan::new(config.batch.round_limit());
            run_session(config, operator, io::stdout(), format)?.0
        }
    };
    Ok(summary)
}

/// Wires feed, count engine, actuator and reporter around `operator`.
pub fn run_session<O, W>(
    config: &BlackjackConfig,
    operator: O,
    out: W,
    format: OutputFormat,
) -> Result<(SessionSummary, W)>
where
    O: Operator,
    W: Write,
{
    let feed = RecordedFeed::from_config(&config.feed)
        .with_context(|| format!("loading feed {}", config.feed.path.display()))?;
    let state = config.count_state()?;
    let machine = ScanMachine::new(
        CountEngine::new(state),
        config.scan.geometry(),
        config.scan.duration(),
    );

    let mut session = Session::new(feed, RecordedClassifier, operator, machine);
    if let Some(actuator) = config.actuator.as_ref() {
        let sink: Box<dyn ActuatorSink> = Box::new(open_device(actuator)?);
        session = session.with_sink(sink);
    }

    event!(
        target: "blackjack_assist::app",
        Level::INFO,
        mode = ?config.mode,
        scan_secs = config.scan.duration_secs,
        decks = config.count.decks_remaining,
        actuator = config.actuator.is_some(),
        "session starting"
    );

    let mut reporter = StatusReporter::new(out, format, config.mode);
    reporter.greet();
    let summary = session.run(|event| reporter.handle(&event));
    reporter.finish(&summary);
    Ok((summary, reporter.into_inner()))
}
