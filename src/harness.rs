//! Rendezvous harness: runs a generator and a detector against one file.

use crate::config::{GeneratorConfig, Mode};
use crate::event::EventRecord;
use crate::rendezvous::{ChannelError, Detection, Detector, DetectorConfig, RendezvousChannel};
use crate::simulation::{ContinuousSimulation, SimulationConfig, SimulationError};
use crate::source::{CosmicRayGenerator, GeneratorError};
use crate::stop::StopToken;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// How long to wait for the detector to report the last pulse.
const SETTLE: Duration = Duration::from_secs(1);

/// Emitted events and what the detector reconstructed from them.
#[derive(Debug, Default)]
pub struct HarnessReport {
    pub emitted: Vec<EventRecord>,
    pub detected: Vec<Detection>,
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error("detector thread panicked")]
    DetectorPanicked,
}

/// Harness for the two-process handshake, run as two threads.
#[derive(Debug, Clone)]
pub struct RendezvousHarness {
    signal_file: PathBuf,
    simulation: SimulationConfig,
    detector: DetectorConfig,
    seed: u64,
}

impl RendezvousHarness {
    /// Harness on `signal_file` with the given loop timing and default detector.
    pub fn new(signal_file: impl Into<PathBuf>, simulation: SimulationConfig) -> Self {
        Self {
            signal_file: signal_file.into(),
            simulation,
            detector: DetectorConfig::default(),
            seed: 0,
        }
    }

    /// Override the detector polling parameters.
    pub fn with_detector(mut self, detector: DetectorConfig) -> Self {
        self.detector = detector;
        self
    }

    /// Seed the generator side.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Emit `count` events through the file and collect detections.
    pub fn run(&self, count: usize) -> Result<HarnessReport, HarnessError> {
        let config = GeneratorConfig::new(Mode::HardwareSim)
            .with_signal_file(&self.signal_file)
            .with_seed(self.seed);
        let mut generator = CosmicRayGenerator::new(config)?;
        let detector = Detector::new(RendezvousChannel::open(&self.signal_file)?, self.detector);

        let gen_stop = StopToken::new();
        let det_stop = StopToken::new();
        let (tx, rx) = mpsc::channel();

        let det_handle = {
            let det_stop = det_stop.clone();
            thread::spawn(move || {
                detector.run(&det_stop, |d| {
                    // Receiver gone: nobody is collecting, so stop polling.
                    if tx.send(*d).is_err() {
                        det_stop.stop();
                    }
                })
            })
        };

        let mut emitted = Vec::new();
        ContinuousSimulation::new(self.simulation).run(&mut generator, &gen_stop, |ev| {
            emitted.push(*ev);
            if emitted.len() >= count {
                gen_stop.stop();
            }
        })?;

        let mut detected = Vec::new();
        let deadline = Instant::now() + SETTLE;
        while detected.len() < emitted.len() {
            match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(d) => detected.push(d),
                Err(_) => break,
            }
        }
        det_stop.stop();
        det_handle
            .join()
            .map_err(|_| HarnessError::DetectorPanicked)??;
        detected.extend(rx.try_iter());

        Ok(HarnessReport { emitted, detected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn harness_basic() {
        let dir = tempdir().unwrap();
        let sim = SimulationConfig::with_backoff(Duration::from_millis(30), Duration::from_millis(40));
        let harness = RendezvousHarness::new(dir.path().join("sig.txt"), sim).with_seed(4);
        let report = harness.run(1).unwrap();
        assert_eq!(report.emitted.len(), 1);
        assert_eq!(report.detected.len(), 1);
    }
}
