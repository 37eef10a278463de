use std::io;

use thiserror::Error;

/// A scan window closed without a usable reading.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("no cards detected (dealer empty: {dealer_empty}, player empty: {player_empty})")]
    NoCardsDetected {
        dealer_empty: bool,
        player_empty: bool,
    },
}

/// Failure to hand a command to the actuator.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("actuator write failed: {0}")]
    Io(#[from] io::Error),
    #[error("actuator is disconnected")]
    Disconnected,
}

impl SinkError {
    /// A closed or unplugged link reads as `Disconnected`; anything else stays `Io`.
    pub fn from_write(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted => SinkError::Disconnected,
            _ => SinkError::Io(err),
        }
    }
}
