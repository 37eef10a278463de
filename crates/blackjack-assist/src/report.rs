use std::io::{self, Write};
use std::time::Duration;

use blackjack_core::strategy::BetUnits;
use blackjack_engine::{DispatchReport, ScanReport, SessionEvent, SessionSummary, Step};
use serde::Serialize;
use tracing::{Level, event};

use crate::config::Mode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per scan outcome.
    Json,
}

/// Turns session events into operator-facing status lines.
pub struct StatusReporter<W: Write> {
    out: W,
    format: OutputFormat,
    mode: Mode,
    shown_second: Option<u64>,
}

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum JsonOutcome<'a> {
    Decided(&'a ScanReport),
    NoCards { message: String },
    Dispatch { bet_sent: bool, action_sent: bool },
}

impl<W: Write> StatusReporter<W> {
    pub fn new(out: W, format: OutputFormat, mode: Mode) -> Self {
        Self {
            out,
            format,
            mode,
            shown_second: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn greet(&mut self) {
        if self.format == OutputFormat::Json {
            return;
        }
        let result = self.write_banner();
        self.check(result);
    }

    pub fn handle(&mut self, event: &SessionEvent) {
        let result = match self.format {
            OutputFormat::Text => self.write_text(event),
            OutputFormat::Json => self.write_json(event),
        };
        self.check(result);
    }

    pub fn finish(&mut self, summary: &SessionSummary) {
        if self.format == OutputFormat::Json {
            return;
        }
        let result = writeln!(
            self.out,
            "\nSession over: {} hand(s) decided, {} failed scan(s), final running count {}",
            summary.decided, summary.failed, summary.running_count
        );
        self.check(result);
    }

    fn write_banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "Blackjack HiLo Strategy Assistant")?;
        if self.mode == Mode::Interactive {
            writeln!(self.out, "Press 's' to start detecting cards or 'q' to quit.")?;
        }
        Ok(())
    }

    fn write_text(&mut self, event: &SessionEvent) -> io::Result<()> {
        match event {
            SessionEvent::Step(Step::Idle) => Ok(()),
            SessionEvent::Step(Step::Started {
                running_count,
                true_count,
            }) => {
                self.shown_second = None;
                writeln!(self.out, "\nStarting scan...")?;
                writeln!(self.out, "Current Running Count: {running_count}")?;
                writeln!(self.out, "Current True Count: {true_count:.2}")?;
                writeln!(
                    self.out,
                    "Suggested Bet: {} unit(s)",
                    BetUnits::from_true_count(*true_count)
                )
            }
            SessionEvent::Step(Step::Scanning { remaining, .. }) => {
                let second = whole_seconds(*remaining);
                if self.shown_second == Some(second) {
                    return Ok(());
                }
                self.shown_second = Some(second);
                writeln!(self.out, "Scanning... {second}s")
            }
            SessionEvent::Step(Step::Decided(report)) => {
                self.write_report(report)?;
                self.prompt_again()
            }
            SessionEvent::Step(Step::Failed(_)) => {
                writeln!(self.out, "No cards detected. Try again.")?;
                self.prompt_again()
            }
            SessionEvent::Step(Step::Quit) => writeln!(self.out, "Exiting..."),
            SessionEvent::Dispatched(report) => self.write_dispatch(report),
        }
    }

    fn write_report(&mut self, report: &ScanReport) -> io::Result<()> {
        let decision = report.decision;
        writeln!(self.out, "Dealer Cards: {}", report.dealer)?;
        writeln!(self.out, "Player Cards: {}", report.player)?;
        writeln!(self.out, "Dealer Card: {}", report.up_card)?;
        writeln!(self.out, "\nCurrent Running Count: {}", report.running_count)?;
        writeln!(self.out, "True Count: {:.2}", report.true_count)?;
        writeln!(
            self.out,
            "Suggested Bet: {} unit(s) (Binary: {})",
            decision.bet_units,
            decision.bet_units.binary_code()
        )?;
        writeln!(self.out, "Player Total: {}", report.player_total)?;
        writeln!(self.out, "Recommended Action: {}", decision.action)
    }

    fn write_dispatch(&mut self, report: &DispatchReport) -> io::Result<()> {
        if report.complete() {
            return Ok(());
        }
        writeln!(
            self.out,
            "Warning: actuator missed commands (bet {}, action {})",
            delivery(report.bet_sent),
            delivery(report.action_sent)
        )
    }

    fn prompt_again(&mut self) -> io::Result<()> {
        if self.mode == Mode::Interactive {
            writeln!(self.out, "\nPress 's' to start a new round or 'q' to quit.")?;
        }
        Ok(())
    }

    fn write_json(&mut self, event: &SessionEvent) -> io::Result<()> {
        let outcome = match event {
            SessionEvent::Step(Step::Decided(report)) => JsonOutcome::Decided(report),
            SessionEvent::Step(Step::Failed(err)) => JsonOutcome::NoCards {
                message: err.to_string(),
            },
            SessionEvent::Dispatched(report) => JsonOutcome::Dispatch {
                bet_sent: report.bet_sent,
                action_sent: report.action_sent,
            },
            _ => return Ok(()),
        };
        serde_json::to_writer(&mut self.out, &outcome)?;
        writeln!(self.out)
    }

    fn check(&mut self, result: io::Result<()>) {
        if let Err(err) = result.and_then(|()| self.out.flush()) {
            event!(
                target: "blackjack_assist::report",
                Level::WARN,
                error = %err,
                "failed to write status output"
            );
        }
    }
}

fn whole_seconds(remaining: Duration) -> u64 {
    remaining.as_secs_f64().ceil() as u64
}

fn delivery(sent: bool) -> &'static str {
    if sent { "sent" } else { "failed" }
}
