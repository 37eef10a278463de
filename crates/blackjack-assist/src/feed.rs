//! Replays recorded classifier output as a live frame stream.
//!
//! Each non-empty line of a recording is one frame: a JSON array of the
//! detections the card classifier produced for it. Blank lines are frames in
//! which nothing was detected.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use blackjack_core::model::observation::CardObservation;
use blackjack_engine::{CardClassifier, FrameSource};
use thiserror::Error;
use tracing::{Level, event};

use crate::config::FeedConfig;

/// Classifier output captured for one camera frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedFrame {
    pub detections: Vec<CardObservation>,
}

pub struct RecordedFeed {
    frames: Vec<RecordedFrame>,
    cursor: usize,
    loop_playback: bool,
    interval: Duration,
}

impl RecordedFeed {
    pub fn from_config(config: &FeedConfig) -> Result<Self, FeedError> {
        let frames = load_frames(&config.path)?;
        event!(
            target: "blackjack_assist::feed",
            Level::INFO,
            path = %config.path.display(),
            frames = frames.len(),
            loop_playback = config.loop_playback,
            "recording loaded"
        );
        Ok(Self::new(
            frames,
            config.loop_playback,
            config.frame_interval(),
        ))
    }

    pub fn new(frames: Vec<RecordedFrame>, loop_playback: bool, interval: Duration) -> Self {
        Self {
            frames,
            cursor: 0,
            loop_playback,
            interval,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for RecordedFeed {
    type Frame = RecordedFrame;

    fn next_frame(&mut self) -> Option<RecordedFrame> {
        if self.cursor >= self.frames.len() {
            if !self.loop_playback || self.frames.is_empty() {
                return None;
            }
            self.cursor = 0;
        }
        // Pace playback like a camera would.
        if !self.interval.is_zero() {
            thread::sleep(self.interval);
        }
        let frame = self.frames[self.cursor].clone();
        self.cursor += 1;
        Some(frame)
    }
}

/// The recording already holds classifier verdicts, so detection is a lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordedClassifier;

impl CardClassifier<RecordedFrame> for RecordedClassifier {
    fn detect(&mut self, frame: &RecordedFrame) -> Vec<CardObservation> {
        frame.detections.clone()
    }
}

pub fn load_frames(path: &Path) -> Result<Vec<RecordedFrame>, FeedError> {
    let file = File::open(path).map_err(|source| FeedError::Read {
        source,
        path: path.to_path_buf(),
    })?;
    parse_frames(BufReader::new(file), path)
}

pub fn parse_frames<R: BufRead>(reader: R, path: &Path) -> Result<Vec<RecordedFrame>, FeedError> {
    let mut frames = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| FeedError::Read {
            source,
            path: path.to_path_buf(),
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            frames.push(RecordedFrame::default());
            continue;
        }
        let detections: Vec<CardObservation> =
            serde_json::from_str(trimmed).map_err(|source| FeedError::Parse {
                source,
                path: path.to_path_buf(),
                line: idx + 1,
            })?;
        frames.push(RecordedFrame { detections });
    }
    Ok(frames)
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read recording {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("malformed frame at {path:?} line {line}: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
        line: usize,
    },
}
