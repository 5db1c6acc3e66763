//! Rendezvous channel: a one-character file standing in for a signal line.
//!
//! A generator writes `"1"` when an event starts, holds for the event's
//! duration, then writes `"0"`. A detector re-opens and re-reads the file
//! on every poll and times the high phase.
//!
//! There is no locking. Each write truncates and rewrites the file, so a
//! poll landing between the truncate and the write sees an empty file
//! (read as low). That race is accepted: the channel models a best-effort
//! line, and a poll interval longer than the shortest pulse misses events.

use crate::invariant_ppt::{assert_invariant, CHANNEL_INITIALIZED, PULSE_COMPLETED};
use crate::stop::StopToken;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Logic level of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Idle, `"0"`.
    Low,
    /// Active, `"1"`.
    High,
}

impl Level {
    /// File content for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "0",
            Level::High => "1",
        }
    }

    /// Decode file content; anything but `"1"` is low.
    pub fn from_content(content: &str) -> Self {
        if content.trim() == "1" {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// I/O failure on the rendezvous file.
#[derive(Debug, Error)]
#[error("rendezvous file {}: {source}", .path.display())]
pub struct ChannelError {
    /// File being accessed.
    pub path: PathBuf,
    /// Underlying failure.
    #[source]
    pub source: io::Error,
}

/// Shared-file signal line.
#[derive(Debug, Clone)]
pub struct RendezvousChannel {
    path: PathBuf,
}

impl RendezvousChannel {
    /// Open the channel at `path`, creating it idle if absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ChannelError> {
        let channel = Self { path: path.into() };
        if !channel.path.exists() {
            channel.write(Level::Low)?;
            debug!("initialized rendezvous file {}", channel.path.display());
        }
        assert_invariant(CHANNEL_INITIALIZED, channel.path.exists(), "rendezvous file exists", None);
        Ok(channel)
    }

    /// Path of the rendezvous file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current level. A missing file reads as low.
    pub fn read(&self) -> Result<Level, ChannelError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Level::from_content(&content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Level::Low),
            Err(source) => Err(self.error(source)),
        }
    }

    /// Overwrite the file with `level`.
    pub fn write(&self, level: Level) -> Result<(), ChannelError> {
        fs::write(&self.path, level.as_str()).map_err(|e| self.error(e))
    }

    /// Drive the line high.
    pub fn raise(&self) -> Result<(), ChannelError> {
        self.write(Level::High)
    }

    /// Release the line.
    pub fn lower(&self) -> Result<(), ChannelError> {
        self.write(Level::Low)
    }

    /// Hold the line high for `hold`, then release it.
    pub fn pulse(&self, hold: Duration) -> Result<(), ChannelError> {
        self.raise()?;
        std::thread::sleep(hold);
        self.lower()?;
        assert_invariant(PULSE_COMPLETED, true, "pulse released", None);
        Ok(())
    }

    fn error(&self, source: io::Error) -> ChannelError {
        ChannelError {
            path: self.path.clone(),
            source,
        }
    }
}

/// Detector polling parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Interval between idle polls.
    pub poll_interval: Duration,
    /// Interval between polls while the line is high.
    pub release_poll_interval: Duration,
    /// Energy units per second of high time.
    pub energy_scale: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            release_poll_interval: Duration::from_millis(1),
            energy_scale: 1e6,
        }
    }
}

/// A pulse reconstructed by the detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Observed high time.
    pub duration: Duration,
    /// `duration * energy_scale`, arbitrary unit.
    pub energy: f64,
}

/// Polling reader on the far side of a rendezvous channel.
#[derive(Debug, Clone)]
pub struct Detector {
    channel: RendezvousChannel,
    config: DetectorConfig,
}

impl Detector {
    /// Detector reading `channel`.
    pub fn new(channel: RendezvousChannel, config: DetectorConfig) -> Self {
        Self { channel, config }
    }

    /// Polling parameters.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Block until one pulse is observed, or `None` once stopped.
    pub fn wait_for_detection(&self, stop: &StopToken) -> Result<Option<Detection>, ChannelError> {
        loop {
            if stop.is_stopped() {
                return Ok(None);
            }
            if self.channel.read()? == Level::High {
                let start = Instant::now();
                while self.channel.read()? == Level::High {
                    if stop.is_stopped() {
                        return Ok(None);
                    }
                    std::thread::sleep(self.config.release_poll_interval);
                }
                let duration = start.elapsed();
                return Ok(Some(Detection {
                    duration,
                    energy: duration.as_secs_f64() * self.config.energy_scale,
                }));
            }
            std::thread::sleep(self.config.poll_interval);
        }
    }

    /// Report every pulse to `on_detection` until stopped.
    ///
    /// Returns the number of pulses seen.
    pub fn run<F>(&self, stop: &StopToken, mut on_detection: F) -> Result<usize, ChannelError>
    where
        F: FnMut(&Detection),
    {
        info!("monitoring {} for rays", self.channel.path().display());
        let mut seen = 0;
        while let Some(detection) = self.wait_for_detection(stop)? {
            seen += 1;
            info!(
                "ray detected: duration={:.5}s energy={:.2}",
                detection.duration.as_secs_f64(),
                detection.energy
            );
            on_detection(&detection);
        }
        info!("detector stopped after {} detections", seen);
        Ok(seen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_initializes_idle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("signal.txt");
        let channel = RendezvousChannel::open(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "0");
        assert_eq!(channel.read().unwrap(), Level::Low);
    }

    #[test]
    fn open_keeps_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("signal.txt");
        fs::write(&path, "1").unwrap();
        let channel = RendezvousChannel::open(&path).unwrap();
        assert_eq!(channel.read().unwrap(), Level::High);
    }

    #[test]
    fn raise_and_lower_overwrite() {
        let dir = tempdir().unwrap();
        let channel = RendezvousChannel::open(dir.path().join("s")).unwrap();
        channel.raise().unwrap();
        assert_eq!(fs::read_to_string(channel.path()).unwrap(), "1");
        channel.lower().unwrap();
        assert_eq!(fs::read_to_string(channel.path()).unwrap(), "0");
    }

    #[test]
    fn content_decoding() {
        assert_eq!(Level::from_content("1\n"), Level::High);
        assert_eq!(Level::from_content(""), Level::Low);
        assert_eq!(Level::from_content("x"), Level::Low);
    }

    #[test]
    fn missing_file_reads_low() {
        let dir = tempdir().unwrap();
        let channel = RendezvousChannel::open(dir.path().join("s")).unwrap();
        fs::remove_file(channel.path()).unwrap();
        assert_eq!(channel.read().unwrap(), Level::Low);
    }

    #[test]
    fn open_in_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let err = RendezvousChannel::open(dir.path().join("no/such/dir/s")).unwrap_err();
        assert!(err.to_string().contains("rendezvous file"));
    }

    #[test]
    fn stopped_detector_returns_none() {
        let dir = tempdir().unwrap();
        let channel = RendezvousChannel::open(dir.path().join("s")).unwrap();
        let detector = Detector::new(channel, DetectorConfig::default());
        let stop = StopToken::new();
        stop.stop();
        assert_eq!(detector.wait_for_detection(&stop).unwrap(), None);
    }
}
