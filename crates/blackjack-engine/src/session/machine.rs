use std::time::{Duration, Instant};

use blackjack_core::model::observation::CardObservation;
use tracing::{Level, event};

use crate::counter::{CountEngine, ScanReport};
use crate::error::ScanError;
use crate::scan::{ConfidenceAggregator, ScanGeometry, resolve};

/// Operator input sampled once per poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trigger {
    #[default]
    None,
    StartScan,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Scanning,
}

/// Result of a single poll.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Idle,
    Started { running_count: i32, true_count: f64 },
    Scanning { remaining: Duration, observed: usize },
    Decided(ScanReport),
    Failed(ScanError),
    Quit,
}

/// `Idle -> Scanning -> (resolve) -> Idle`, driven by an external clock.
///
/// Resolution happens inside the poll that notices the window has closed, so
/// there is no separate resolving phase to observe from outside.
#[derive(Debug, Clone)]
pub struct ScanMachine {
    duration: Duration,
    aggregator: ConfidenceAggregator,
    engine: CountEngine,
    scan_started: Option<Instant>,
}

impl ScanMachine {
    pub fn new(engine: CountEngine, geometry: ScanGeometry, duration: Duration) -> Self {
        Self {
            duration,
            aggregator: ConfidenceAggregator::new(geometry),
            engine,
            scan_started: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.scan_started {
            Some(_) => Phase::Scanning,
            None => Phase::Idle,
        }
    }

    pub fn engine(&self) -> &CountEngine {
        &self.engine
    }

    pub fn scan_duration(&self) -> Duration {
        self.duration
    }

    /// Advances the machine by one frame. `detect` is only invoked while a
    /// scan window is open, so idle frames are never classified.
    pub fn poll<F>(&mut self, now: Instant, trigger: Trigger, detect: F) -> Step
    where
        F: FnOnce() -> Vec<CardObservation>,
    {
        if trigger == Trigger::Quit {
            self.cancel();
            return Step::Quit;
        }

        let Some(started) = self.scan_started else {
            return match trigger {
                Trigger::StartScan => self.start(now),
                _ => Step::Idle,
            };
        };

        let elapsed = now.saturating_duration_since(started);
        if elapsed >= self.duration {
            self.scan_started = None;
            return self.finish();
        }

        self.aggregator.observe(&detect());
        Step::Scanning {
            remaining: self.duration - elapsed,
            observed: self.aggregator.observation_count(),
        }
    }

    /// Drops any partial scan and returns to idle.
    pub fn cancel(&mut self) {
        if self.scan_started.take().is_some() {
            event!(
                target: "blackjack_engine::scan",
                Level::INFO,
                "scan cancelled"
            );
        }
        self.aggregator.reset();
    }

    fn start(&mut self, now: Instant) -> Step {
        self.aggregator.reset();
        self.scan_started = Some(now);
        event!(
            target: "blackjack_engine::scan",
            Level::INFO,
            duration_ms = self.duration.as_millis() as u64,
            running_count = self.engine.running_count(),
            "scan started"
        );
        Step::Started {
            running_count: self.engine.running_count(),
            true_count: self.engine.true_count(),
        }
    }

    fn finish(&mut self) -> Step {
        let (dealer_table, player_table) = self.aggregator.take();
        let dealer = resolve(&dealer_table);
        let player = resolve(&player_table);
        match self.engine.settle(dealer, player) {
            Ok(report) => Step::Decided(report),
            Err(err) => {
                event!(
                    target: "blackjack_engine::scan",
                    Level::INFO,
                    dealer_observations = dealer_table.observation_count(),
                    player_observations = player_table.observation_count(),
                    error = %err,
                    "scan discarded"
                );
                Step::Failed(err)
            }
        }
    }
}
