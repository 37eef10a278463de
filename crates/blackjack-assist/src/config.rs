use blackjack_core::count::{CountError, CountState, DecksRemaining};
use blackjack_engine::ScanGeometry;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

const DEFAULT_SCAN_SECS: f64 = 5.0;
const DEFAULT_FRAME_HEIGHT: u32 = 720;
const DEFAULT_FRAME_INTERVAL_MS: u64 = 100;
const DEFAULT_SETTLE_MS: u64 = 100;

/// Root assistant configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BlackjackConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    pub count: CountConfig,
    pub feed: FeedConfig,
    #[serde(default)]
    pub actuator: Option<ActuatorConfig>,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BlackjackConfig {
    /// Load and validate configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut cfg = Self::load(path)?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(cfg)
    }

    /// Parse a YAML file without validating it, so overrides can be applied
    /// before [`BlackjackConfig::validate`] runs.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path.to_path_buf(),
        })?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.scan.validate()?;
        self.count.decks()?;
        self.feed.validate()?;
        if let Some(actuator) = self.actuator.as_ref() {
            actuator.validate()?;
        }
        self.logging.normalize();
        Ok(())
    }

    pub fn count_state(&self) -> Result<CountState, ValidationError> {
        Ok(CountState::with_running_count(
            self.count.initial_running_count,
            self.count.decks()?,
        ))
    }
}

/// Scan window and frame geometry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScanConfig {
    #[serde(default = "default_scan_secs")]
    pub duration_secs: f64,
    #[serde(default = "default_frame_height")]
    pub frame_height: u32,
    #[serde(default = "default_dealer_split")]
    pub dealer_split: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_SCAN_SECS,
            frame_height: DEFAULT_FRAME_HEIGHT,
            dealer_split: ScanGeometry::DEFAULT_SPLIT,
        }
    }
}

impl ScanConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(self.duration_secs.is_finite() && self.duration_secs > 0.0) {
            return Err(ValidationError::InvalidField {
                field: "scan.duration_secs".to_string(),
                message: "scan duration must be a positive number of seconds".to_string(),
            });
        }

        if Duration::try_from_secs_f64(self.duration_secs).is_err() {
            return Err(ValidationError::InvalidField {
                field: "scan.duration_secs".to_string(),
                message: format!("{} seconds is too long for a scan window", self.duration_secs),
            });
        }

        if self.frame_height == 0 {
            return Err(ValidationError::InvalidField {
                field: "scan.frame_height".to_string(),
                message: "frame height must be greater than zero".to_string(),
            });
        }

        if !(self.dealer_split > 0.0 && self.dealer_split < 1.0) {
            return Err(ValidationError::InvalidField {
                field: "scan.dealer_split".to_string(),
                message: "dealer split must be a fraction between 0 and 1".to_string(),
            });
        }

        Ok(())
    }

    /// Saturates for values `validate` would reject.
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_secs).unwrap_or(Duration::MAX)
    }

    pub fn geometry(&self) -> ScanGeometry {
        ScanGeometry::new(f64::from(self.frame_height), self.dealer_split)
    }
}

fn default_scan_secs() -> f64 {
    DEFAULT_SCAN_SECS
}

fn default_frame_height() -> u32 {
    DEFAULT_FRAME_HEIGHT
}

fn default_dealer_split() -> f64 {
    ScanGeometry::DEFAULT_SPLIT
}

/// Shoe state at startup.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CountConfig {
    pub decks_remaining: f64,
    #[serde(default)]
    pub initial_running_count: i32,
}

impl CountConfig {
    pub fn decks(&self) -> Result<DecksRemaining, ValidationError> {
        DecksRemaining::new(self.decks_remaining).map_err(|source| ValidationError::Count {
            field: "count.decks_remaining".to_string(),
            source,
        })
    }
}

/// Recorded classifier output replayed as a frame stream.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FeedConfig {
    pub path: PathBuf,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default = "default_true")]
    pub loop_playback: bool,
}

impl FeedConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "feed.path".to_string(),
                message: "path must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

fn default_frame_interval_ms() -> u64 {
    DEFAULT_FRAME_INTERVAL_MS
}

fn default_true() -> bool {
    true
}

/// Serial link to the micro-controller.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ActuatorConfig {
    pub port: PathBuf,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl ActuatorConfig {
    pub fn new(port: impl Into<PathBuf>) -> Self {
        Self {
            port: port.into(),
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.port.as_os_str().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "actuator.port".to_string(),
                message: "port must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

fn default_settle_ms() -> u64 {
    DEFAULT_SETTLE_MS
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Operator types `s` to scan and `q` to quit.
    #[default]
    Interactive,
    /// Scan back to back until the round limit or the feed runs out.
    Batch,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BatchConfig {
    /// Zero means no limit.
    #[serde(default)]
    pub rounds: u32,
}

impl BatchConfig {
    pub fn round_limit(&self) -> Option<u32> {
        (self.rounds > 0).then_some(self.rounds)
    }
}

/// Logging configuration defaults to human-readable stderr output.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            directory: default_log_directory(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "warn".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
    #[error("{field}: {source}")]
    Count {
        field: String,
        #[source]
        source: CountError,
    },
}
