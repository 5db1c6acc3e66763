//! Event sources and the generator that owns one.
//!
//! Each [`Mode`] has its own [`EventSource`] implementation. The generator
//! picks it once, at construction, and never branches on the mode again
//! when producing events.

use crate::config::{ConfigError, GeneratorConfig, Mode};
use crate::event::EventRecord;
use crate::event_log::read_events_from_file;
use crate::invariant_ppt::{assert_invariant, SOURCE_SELECTED_ONCE};
use crate::rendezvous::{ChannelError, RendezvousChannel};
use crate::synth::{Signal, SignalSynthesizer};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Range of the one-shot simulated event count (inclusive).
pub const SIM_EVENT_COUNT: std::ops::RangeInclusive<usize> = 3..=8;
/// Simulated events are spaced `duration / SIM_SPREAD_DIVISOR` apart.
pub const SIM_SPREAD_DIVISOR: f64 = 10.0;

/// A producer of event sequences for one mode.
pub trait EventSource: Send + fmt::Debug {
    /// The mode this source implements.
    fn mode(&self) -> Mode;

    /// Produce one batch of events.
    fn events(&mut self, rng: &mut dyn RngCore) -> Vec<EventRecord>;

    /// The rendezvous channel this source drives, if any.
    fn channel(&self) -> Option<&RendezvousChannel> {
        None
    }
}

/// The fixed demo sequence.
pub fn predefined_events() -> Vec<EventRecord> {
    vec![
        EventRecord::new(1.0, 2.3).with_altitude(2500.0),
        EventRecord::new(4.5, 1.5).with_altitude(2300.0),
        EventRecord::new(6.2, 3.0).with_altitude(2700.0),
        EventRecord::new(8.7, 2.0).with_altitude(2400.0),
    ]
}

/// Hand-authored fixture source.
#[derive(Debug, Clone, Default)]
pub struct PredefinedSource;

impl EventSource for PredefinedSource {
    fn mode(&self) -> Mode {
        Mode::Predefined
    }

    fn events(&mut self, _rng: &mut dyn RngCore) -> Vec<EventRecord> {
        predefined_events()
    }
}

/// Replays an event log from disk on every call.
#[derive(Debug, Clone)]
pub struct FileReplaySource {
    path: PathBuf,
}

impl FileReplaySource {
    /// Replay the log at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the replayed log.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSource for FileReplaySource {
    fn mode(&self) -> Mode {
        Mode::File
    }

    fn events(&mut self, _rng: &mut dyn RngCore) -> Vec<EventRecord> {
        read_events_from_file(&self.path)
    }
}

/// Random one-shot batches, evenly spread over the window.
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    window: f64,
}

impl SimulatedSource {
    /// `window` is the simulated window length in seconds.
    pub fn new(window: f64) -> Self {
        Self { window }
    }
}

impl EventSource for SimulatedSource {
    fn mode(&self) -> Mode {
        Mode::Simulated
    }

    fn events(&mut self, rng: &mut dyn RngCore) -> Vec<EventRecord> {
        let count = rng.gen_range(SIM_EVENT_COUNT);
        let spacing = self.window / SIM_SPREAD_DIVISOR;
        (0..count)
            .map(|i| EventRecord::random(&mut *rng, i as f64 * spacing))
            .collect()
    }
}

/// Hardware simulation: events exist only as pulses on the channel, so a
/// one-shot batch is empty. The continuous loop drives the channel.
#[derive(Debug, Clone)]
pub struct HardwareSimSource {
    channel: RendezvousChannel,
}

impl HardwareSimSource {
    /// Open (and if needed initialize) the rendezvous file.
    pub fn open(signal_file: impl Into<PathBuf>) -> Result<Self, ChannelError> {
        Ok(Self {
            channel: RendezvousChannel::open(signal_file)?,
        })
    }
}

impl EventSource for HardwareSimSource {
    fn mode(&self) -> Mode {
        Mode::HardwareSim
    }

    fn events(&mut self, _rng: &mut dyn RngCore) -> Vec<EventRecord> {
        Vec::new()
    }

    fn channel(&self) -> Option<&RendezvousChannel> {
        Some(&self.channel)
    }
}

/// Failure to build a generator.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// Unified cosmic-ray event generator.
#[derive(Debug)]
pub struct CosmicRayGenerator {
    config: GeneratorConfig,
    source: Box<dyn EventSource>,
    rng: StdRng,
}

impl CosmicRayGenerator {
    /// Validate `config` and build the generator for its mode.
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        config.validate()?;
        Self::new_unchecked(config)
    }

    /// Build without validating. Missing paths fall back to the defaults.
    pub fn new_unchecked(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        let source: Box<dyn EventSource> = match config.mode {
            Mode::Predefined => Box::new(PredefinedSource),
            Mode::File => Box::new(FileReplaySource::new(config.event_log_or_default())),
            Mode::Simulated => Box::new(SimulatedSource::new(config.duration)),
            Mode::HardwareSim => Box::new(HardwareSimSource::open(config.signal_file_or_default())?),
        };
        assert_invariant(
            SOURCE_SELECTED_ONCE,
            source.mode() == config.mode,
            "source matches configured mode",
            Some(config.mode.as_str()),
        );
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!("generator ready in {} mode", config.mode);
        Ok(Self { config, source, rng })
    }

    /// The validated configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The configured mode.
    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// The rendezvous channel, in hardware simulation mode.
    pub fn channel(&self) -> Option<&RendezvousChannel> {
        self.source.channel()
    }

    /// The fixed demo sequence; identical on every call.
    pub fn get_predefined_events(&self) -> Vec<EventRecord> {
        predefined_events()
    }

    /// Read the configured event log leniently, regardless of mode.
    pub fn read_events_from_file(&self) -> Vec<EventRecord> {
        read_events_from_file(self.config.event_log_or_default())
    }

    /// One random event stamped with the current wall-clock time.
    pub fn generate_random_event(&mut self) -> EventRecord {
        EventRecord::now_random(&mut self.rng)
    }

    /// One batch of events from the configured source.
    pub fn get_events(&mut self) -> Vec<EventRecord> {
        self.source.events(&mut self.rng)
    }

    /// Synthesizer for this generator's window and noise level.
    pub fn synthesizer(&self, sample_rate: u32) -> SignalSynthesizer {
        SignalSynthesizer::new(sample_rate, self.config.duration, self.config.noise_level)
    }

    /// Pull a batch of events and synthesize it.
    pub fn generate_signal(&mut self, sample_rate: u32) -> Signal {
        let events = self.get_events();
        self.synthesizer(sample_rate).synthesize(&events, &mut self.rng)
    }

    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
