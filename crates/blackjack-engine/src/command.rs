use std::io::Write;
use std::thread;
use std::time::Duration;

use blackjack_core::strategy::Decision;
use tracing::{Level, event};

use crate::error::SinkError;

/// Pause after each write so the micro-controller can keep up.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(100);

/// Anything that accepts one ASCII command at a time.
pub trait ActuatorSink {
    fn send(&mut self, message: &str) -> Result<(), SinkError>;
}

impl<S: ActuatorSink + ?Sized> ActuatorSink for Box<S> {
    fn send(&mut self, message: &str) -> Result<(), SinkError> {
        (**self).send(message)
    }
}

/// The two messages relayed per decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commands {
    pub bet: String,
    pub action: String,
}

pub fn encode(decision: &Decision) -> Commands {
    Commands {
        bet: decision.bet_units.binary_code(),
        action: decision.action.code().to_string(),
    }
}

/// Which halves of a decision made it to the actuator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub bet_sent: bool,
    pub action_sent: bool,
}

impl DispatchReport {
    pub fn complete(&self) -> bool {
        self.bet_sent && self.action_sent
    }
}

/// Sends bet then action as independent writes. A failed write is logged and
/// does not stop the other one; nothing is retried or rolled back.
pub fn dispatch<S: ActuatorSink + ?Sized>(sink: &mut S, commands: &Commands) -> DispatchReport {
    DispatchReport {
        bet_sent: send_logged(sink, "bet", &commands.bet),
        action_sent: send_logged(sink, "action", &commands.action),
    }
}

fn send_logged<S: ActuatorSink + ?Sized>(sink: &mut S, kind: &str, message: &str) -> bool {
    match sink.send(message) {
        Ok(()) => {
            event!(
                target: "blackjack_engine::actuator",
                Level::DEBUG,
                kind,
                command = message,
                "command sent"
            );
            true
        }
        Err(err) => {
            event!(
                target: "blackjack_engine::actuator",
                Level::WARN,
                kind,
                command = message,
                error = %err,
                "actuator write failed"
            );
            false
        }
    }
}

/// Newline-terminated writer over any byte channel (serial device, pipe, file).
#[derive(Debug)]
pub struct LineSink<W: Write> {
    writer: W,
    settle: Duration,
}

impl<W: Write> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self::with_settle(writer, DEFAULT_SETTLE)
    }

    pub fn with_settle(writer: W, settle: Duration) -> Self {
        Self { writer, settle }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, message: &str) -> std::io::Result<()> {
        self.writer.write_all(message.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl<W: Write> ActuatorSink for LineSink<W> {
    fn send(&mut self, message: &str) -> Result<(), SinkError> {
        self.write_line(message).map_err(SinkError::from_write)?;
        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack_core::strategy::{Action, BetUnits};

    struct FlakySink {
        sent: Vec<String>,
        fail_on: usize,
        calls: usize,
    }

    impl ActuatorSink for FlakySink {
        fn send(&mut self, message: &str) -> Result<(), SinkError> {
            self.calls += 1;
            if self.calls == self.fail_on {
                return Err(SinkError::Disconnected);
            }
            self.sent.push(message.to_string());
            Ok(())
        }
    }

    #[test]
    fn encodes_bet_and_action() {
        let decision = Decision {
            bet_units: BetUnits::Three,
            action: Action::DoubleDown,
        };
        let commands = encode(&decision);
        assert_eq!(commands.bet, "011");
        assert_eq!(commands.action, "D");
    }

    #[test]
    fn line_sink_terminates_with_newline() {
        let mut sink = LineSink::with_settle(Vec::new(), Duration::ZERO);
        sink.send("001").expect("write");
        sink.send("H").expect("write");
        assert_eq!(sink.into_inner(), b"001\nH\n");
    }

    struct Unplugged(std::io::ErrorKind);

    impl Write for Unplugged {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(self.0.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn broken_link_reports_disconnected() {
        let mut sink =
            LineSink::with_settle(Unplugged(std::io::ErrorKind::BrokenPipe), Duration::ZERO);
        assert!(matches!(sink.send("001"), Err(SinkError::Disconnected)));

        let mut sink =
            LineSink::with_settle(Unplugged(std::io::ErrorKind::PermissionDenied), Duration::ZERO);
        assert!(matches!(sink.send("H"), Err(SinkError::Io(_))));
    }

    #[test]
    fn line_sink_debug_names_settle_time() {
        let sink = LineSink::with_settle(Vec::new(), Duration::from_millis(5));
        assert!(format!("{sink:?}").contains("settle: 5ms"));
    }

    #[test]
    fn failed_bet_still_sends_action() {
        let mut sink = FlakySink {
            sent: Vec::new(),
            fail_on: 1,
            calls: 0,
        };
        let commands = Commands {
            bet: "010".into(),
            action: "S".into(),
        };
        let report = dispatch(&mut sink, &commands);
        assert!(!report.bet_sent);
        assert!(report.action_sent);
        assert!(!report.complete());
        assert_eq!(sink.sent, vec!["S".to_string()]);
    }

    #[test]
    fn partial_delivery_is_reported() {
        let mut sink = FlakySink {
            sent: Vec::new(),
            fail_on: 2,
            calls: 0,
        };
        let commands = Commands {
            bet: "101".into(),
            action: "H".into(),
        };
        let report = dispatch(&mut sink, &commands);
        assert_eq!(
            report,
            DispatchReport {
                bet_sent: true,
                action_sent: false
            }
        );
        assert_eq!(sink.sent, vec!["101".to_string()]);
    }
}
