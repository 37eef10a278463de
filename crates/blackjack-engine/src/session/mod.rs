mod machine;

pub use machine::{Phase, ScanMachine, Step, Trigger};

use std::time::Instant;

use blackjack_core::model::observation::CardObservation;
use tracing::{Level, event};

use crate::command::{ActuatorSink, DispatchReport, dispatch, encode};

/// Yields one frame per poll; `None` means the stream has closed.
pub trait FrameSource {
    type Frame;

    fn next_frame(&mut self) -> Option<Self::Frame>;
}

/// Per-frame card detection. Returns zero or more candidates.
pub trait CardClassifier<F> {
    fn detect(&mut self, frame: &F) -> Vec<CardObservation>;
}

/// Start/quit input, sampled once per loop iteration.
pub trait Operator {
    fn poll(&mut self, phase: Phase) -> Trigger;
}

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Batch front end: starts a new scan whenever the machine is idle, and quits
/// after `rounds` scans if a limit is set.
#[derive(Debug, Clone, Default)]
pub struct AutoScan {
    rounds: Option<u32>,
    started: u32,
}

impl AutoScan {
    pub fn new(rounds: Option<u32>) -> Self {
        Self { rounds, started: 0 }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }
}

impl Operator for AutoScan {
    fn poll(&mut self, phase: Phase) -> Trigger {
        if phase == Phase::Scanning {
            return Trigger::None;
        }
        if self.rounds.is_some_and(|limit| self.started >= limit) {
            return Trigger::Quit;
        }
        self.started += 1;
        Trigger::StartScan
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Step(Step),
    Dispatched(DispatchReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    StreamClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames: u64,
    pub decided: u32,
    pub failed: u32,
    pub running_count: i32,
    pub exit: ExitReason,
}

/// The single-threaded polling loop tying collaborators to the scan machine.
pub struct Session<S, C, O>
where
    S: FrameSource,
    C: CardClassifier<S::Frame>,
    O: Operator,
{
    source: S,
    classifier: C,
    operator: O,
    machine: ScanMachine,
    sink: Option<Box<dyn ActuatorSink>>,
    clock: Box<dyn Clock>,
}

impl<S, C, O> Session<S, C, O>
where
    S: FrameSource,
    C: CardClassifier<S::Frame>,
    O: Operator,
{
    pub fn new(source: S, classifier: C, operator: O, machine: ScanMachine) -> Self {
        Self {
            source,
            classifier,
            operator,
            machine,
            sink: None,
            clock: Box::new(MonotonicClock),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn ActuatorSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn machine(&self) -> &ScanMachine {
        &self.machine
    }

    /// Runs until the operator quits or the frame stream closes.
    pub fn run<F>(&mut self, mut observer: F) -> SessionSummary
    where
        F: FnMut(SessionEvent),
    {
        let mut frames = 0u64;
        let mut decided = 0u32;
        let mut failed = 0u32;

        let exit = loop {
            let Some(frame) = self.source.next_frame() else {
                break ExitReason::StreamClosed;
            };
            frames += 1;

            let trigger = self.operator.poll(self.machine.phase());
            let now = self.clock.now();
            let classifier = &mut self.classifier;
            let step = self
                .machine
                .poll(now, trigger, || classifier.detect(&frame));

            let commands = match &step {
                Step::Decided(report) => {
                    decided += 1;
                    Some(encode(&report.decision))
                }
                Step::Failed(_) => {
                    failed += 1;
                    None
                }
                _ => None,
            };
            let quit = matches!(step, Step::Quit);

            observer(SessionEvent::Step(step));

            if let (Some(commands), Some(sink)) = (commands, self.sink.as_mut()) {
                let report = dispatch(sink, &commands);
                observer(SessionEvent::Dispatched(report));
            }

            if quit {
                break ExitReason::Quit;
            }
        };

        let summary = SessionSummary {
            frames,
            decided,
            failed,
            running_count: self.machine.engine().running_count(),
            exit,
        };
        event!(
            target: "blackjack_engine::session",
            Level::INFO,
            frames,
            decided,
            failed,
            running_count = summary.running_count,
            exit = ?exit,
            "session ended"
        );
        summary
    }
}
