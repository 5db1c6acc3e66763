//! Generator configuration: mode selection and validation.

use crate::invariant_ppt::{assert_invariant, CONFIG_VALIDATED};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Default rendezvous file for hardware simulation.
pub const DEFAULT_SIGNAL_FILE: &str = "ray_signal.txt";
/// Default event log for file replay.
pub const DEFAULT_EVENT_LOG: &str = "event_log.txt";
/// Default simulated window, in seconds.
pub const DEFAULT_DURATION: f64 = 10.0;
/// Default noise floor of synthesized signals.
pub const DEFAULT_NOISE_LEVEL: f64 = 0.05;

/// How a generator produces its events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Random events, spread evenly over the window.
    Simulated,
    /// Random events driving a rendezvous file.
    HardwareSim,
    /// A fixed, hand-authored sequence.
    Predefined,
    /// Replay of a whitespace/comma delimited event log.
    File,
}

impl Mode {
    /// All modes, in declaration order.
    pub const ALL: [Mode; 4] = [Mode::Simulated, Mode::HardwareSim, Mode::Predefined, Mode::File];

    /// The textual tag of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Simulated => "simulated",
            Mode::HardwareSim => "hardware_sim",
            Mode::Predefined => "predefined",
            Mode::File => "file",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidMode(s.to_string()))
    }
}

/// Errors raised while validating a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Mode tag is not one of the known modes.
    #[error("invalid mode '{0}': choose from 'simulated', 'hardware_sim', 'predefined' or 'file'")]
    InvalidMode(String),
    /// File mode without an event log path.
    #[error("event log file path must be provided for 'file' mode")]
    MissingEventLog,
    /// Hardware simulation without a signal file path.
    #[error("signal file path must be provided for 'hardware_sim' mode")]
    MissingSignalFile,
    /// A numeric field is out of its valid range.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
}

/// Generator configuration. Validated once, immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Event production mode.
    pub mode: Mode,
    /// Rendezvous file; only meaningful for `HardwareSim`.
    pub signal_file: Option<PathBuf>,
    /// Event log; only meaningful for `File`.
    pub event_log: Option<PathBuf>,
    /// Total simulated window in seconds.
    pub duration: f64,
    /// Base level of the synthesized noise floor.
    pub noise_level: f64,
    /// Seed for reproducible random draws.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Predefined,
            signal_file: None,
            event_log: None,
            duration: DEFAULT_DURATION,
            noise_level: DEFAULT_NOISE_LEVEL,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Start a configuration for `mode` with default parameters.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Set the event production mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the rendezvous file used by `HardwareSim`.
    pub fn with_signal_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.signal_file = Some(path.into());
        self
    }

    /// Set the event log replayed by `File`.
    pub fn with_event_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.event_log = Some(path.into());
        self
    }

    /// Set the simulated window, in seconds.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Set the noise floor level.
    pub fn with_noise_level(mut self, noise_level: f64) -> Self {
        self.noise_level = noise_level;
        self
    }

    /// Seed every random draw of the generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rendezvous file path, falling back to the default name.
    pub fn signal_file_or_default(&self) -> &Path {
        self.signal_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SIGNAL_FILE))
    }

    /// Event log path, falling back to the default name.
    pub fn event_log_or_default(&self) -> &Path {
        self.event_log
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_EVENT_LOG))
    }

    /// Check the mode/path invariants and numeric ranges.
    ///
    /// Paths supplied for a mode that does not use them are accepted
    /// but reported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode == Mode::File && is_blank(self.event_log.as_deref()) {
            return Err(ConfigError::MissingEventLog);
        }
        if self.mode == Mode::HardwareSim && is_blank(self.signal_file.as_deref()) {
            return Err(ConfigError::MissingSignalFile);
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "duration",
                value: self.duration,
            });
        }
        if !self.noise_level.is_finite() || self.noise_level < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "noise_level",
                value: self.noise_level,
            });
        }

        if self.mode != Mode::HardwareSim && self.signal_file.is_some() {
            warn!("'signal_file' parameter is only used in 'hardware_sim' mode");
        }
        if self.mode != Mode::File && self.event_log.is_some() {
            warn!("'event_log' parameter is only used in 'file' mode");
        }

        assert_invariant(CONFIG_VALIDATED, true, "configuration validated", Some(self.mode.as_str()));
        Ok(())
    }
}

fn is_blank(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p.as_os_str().is_empty())
}
