use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use blackjack_engine::{ActuatorSink, LineSink, SinkError};
use thiserror::Error;
use tracing::{Level, event};

use crate::config::ActuatorConfig;

#[derive(Debug, Error)]
#[error("failed to open actuator port {port:?}: {source}")]
pub struct OpenError {
    #[source]
    source: io::Error,
    port: PathBuf,
}

/// Opens the serial device for writing. Line settings are left to the OS
/// (`stty`), the link only carries newline-terminated ASCII commands.
pub fn open_device(config: &ActuatorConfig) -> Result<LineSink<File>, OpenError> {
    let file = OpenOptions::new()
        .write(true)
        .open(&config.port)
        .map_err(|source| OpenError {
            source,
            port: config.port.clone(),
        })?;
    event!(
        target: "blackjack_assist::actuator",
        Level::INFO,
        port = %config.port.display(),
        settle_ms = config.settle_ms,
        "actuator connected"
    );
    Ok(LineSink::with_settle(file, config.settle()))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSummary {
    pub sent: u32,
    pub failed: u32,
}

/// Relays operator-typed lines to the actuator until `q` or end of input.
pub fn run_probe<R, W, S>(input: R, mut output: W, sink: &mut S) -> io::Result<ProbeSummary>
where
    R: BufRead,
    W: Write,
    S: ActuatorSink + ?Sized,
{
    let mut summary = ProbeSummary::default();
    writeln!(output, "Enter a command to send ('q' to quit):")?;
    for line in input.lines() {
        let line = line?;
        let message = line.trim();
        if message.eq_ignore_ascii_case("q") {
            break;
        }
        if message.is_empty() {
            continue;
        }
        match sink.send(message) {
            Ok(()) => {
                summary.sent += 1;
                writeln!(output, "Sent: {message}")?;
            }
            Err(err) => {
                summary.failed += 1;
                report_failure(&mut output, message, &err)?;
            }
        }
    }
    Ok(summary)
}

fn report_failure<W: Write>(output: &mut W, message: &str, err: &SinkError) -> io::Result<()> {
    event!(
        target: "blackjack_assist::actuator",
        Level::WARN,
        command = message,
        error = %err,
        "probe send failed"
    );
    writeln!(output, "Failed to send '{message}': {err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;

    struct Recorder(Vec<String>);

    impl ActuatorSink for Recorder {
        fn send(&mut self, message: &str) -> Result<(), SinkError> {
            if message == "boom" {
                return Err(SinkError::Disconnected);
            }
            self.0.push(message.to_string());
            Ok(())
        }
    }

    #[test]
    fn probe_relays_until_quit() {
        let mut sink = Recorder(Vec::new());
        let mut shown = Vec::new();
        let summary = run_probe(Cursor::new("101\n\nH\nboom\nQ\nS\n"), &mut shown, &mut sink)
            .expect("probe");
        assert_eq!(sink.0, vec!["101", "H"]);
        assert_eq!(summary, ProbeSummary { sent: 2, failed: 1 });
        let shown = String::from_utf8(shown).expect("utf8");
        assert!(shown.contains("Sent: 101"));
        assert!(shown.contains("Failed to send 'boom'"));
    }

    #[test]
    fn device_file_receives_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let port = dir.path().join("ttyFAKE");
        std::fs::write(&port, "").expect("create port");
        let config = ActuatorConfig {
            port: port.clone(),
            settle_ms: 0,
        };
        let mut sink = open_device(&config).expect("open");
        sink.send("011").expect("send bet");
        sink.send("D").expect("send action");
        drop(sink);
        assert_eq!(std::fs::read_to_string(&port).expect("read"), "011\nD\n");
        assert_eq!(config.settle(), Duration::ZERO);
    }

    #[test]
    fn missing_device_reports_port() {
        let config = ActuatorConfig {
            port: PathBuf::from("/definitely/not/a/port"),
            settle_ms: 0,
        };
        let err = open_device(&config).expect_err("missing");
        assert!(err.to_string().contains("/definitely/not/a/port"));
    }
}
