use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use blackjack_engine::{Operator, Phase, Trigger};

/// Line-based operator console: `s` starts a scan, `q` quits.
///
/// Lines are read on a helper thread. While idle the console waits for the
/// next command; while scanning it only checks for a pending one, so `q`
/// interrupts a scan at the next frame.
pub struct Console<W> {
    lines: Receiver<String>,
    output: W,
}

impl<W: Write> Console<W> {
    pub fn new<R>(input: R, output: W) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in input.lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self::from_channel(rx, output)
    }

    pub fn from_channel(lines: Receiver<String>, output: W) -> Self {
        Self { lines, output }
    }

    fn interpret(&mut self, line: &str, phase: Phase) -> Trigger {
        match line.trim().to_ascii_lowercase().as_str() {
            "s" | "scan" if phase == Phase::Idle => Trigger::StartScan,
            "q" | "quit" | "exit" => Trigger::Quit,
            "" => Trigger::None,
            "s" | "scan" => {
                let _ = writeln!(self.output, "Scan already running.");
                Trigger::None
            }
            other => {
                let _ = writeln!(
                    self.output,
                    "Unknown command '{other}'. Press 's' to scan or 'q' to quit."
                );
                Trigger::None
            }
        }
    }
}

impl<W: Write> Operator for Console<W> {
    fn poll(&mut self, phase: Phase) -> Trigger {
        match phase {
            Phase::Idle => match self.lines.recv() {
                Ok(line) => self.interpret(&line, phase),
                Err(_) => Trigger::Quit,
            },
            // A closed input lets the running scan finish; the next idle poll quits.
            Phase::Scanning => match self.lines.try_recv() {
                Ok(line) => self.interpret(&line, phase),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => Trigger::None,
            },
        }
    }
}
