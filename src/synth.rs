//! Signal synthesis: events to a sampled decaying-pulse signal.
//!
//! Every sample starts at the noise level plus uniform jitter. Each event
//! then adds a causal exponential pulse starting at `floor(time * rate)`:
//! `energy * exp(-k / (0.02 * rate))` for the `floor(0.1 * rate)` samples
//! of its 100 ms window. Pulses are summed onto whatever is already there,
//! so coincident events stack. Nothing is clipped here.

use crate::event::EventRecord;
use crate::invariant_ppt::{
    assert_invariant, EVENT_OUT_OF_RANGE, NON_POSITIVE_ENERGY, PULSE_SUPERPOSED, SIGNAL_LENGTH,
};
use rand::Rng;

/// Length of a pulse window, in seconds.
pub const DECAY_WINDOW_SECS: f64 = 0.1;
/// Exponential time constant of a pulse, in seconds.
pub const DECAY_TIME_CONSTANT_SECS: f64 = 0.02;
/// Half-width of the uniform jitter added to every sample.
pub const NOISE_JITTER: f64 = 0.01;
/// Default sample rate of synthesized signals, in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 100;

/// A sampled signal with its time base.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Samples per second.
    pub sample_rate: u32,
    /// Time of each sample, `i / sample_rate`.
    pub times: Vec<f64>,
    /// Amplitude of each sample.
    pub values: Vec<f64>,
}

impl Signal {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the signal has no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest absolute amplitude, 0 for an empty signal.
    pub fn peak(&self) -> f64 {
        self.values.iter().fold(0.0, |acc, v| acc.max(v.abs()))
    }

    /// Mean amplitude, 0 for an empty signal.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}

/// Outcome of placing one event onto a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Pulse added covering `len` samples from `start`.
    Added { start: usize, len: usize },
    /// Event carries no positive energy.
    NoEnergy,
    /// Event starts before the signal or at/after its end.
    OutOfRange,
}

/// Decaying-pulse synthesizer for a fixed window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSynthesizer {
    pub sample_rate: u32,
    /// Window length in seconds.
    pub duration: f64,
    /// Base amplitude of every sample.
    pub noise_level: f64,
}

impl SignalSynthesizer {
    /// Synthesizer for `duration` seconds at `sample_rate` Hz.
    pub fn new(sample_rate: u32, duration: f64, noise_level: f64) -> Self {
        Self {
            sample_rate,
            duration,
            noise_level,
        }
    }

    /// Number of samples in the window.
    pub fn signal_len(&self) -> usize {
        let n = self.duration * self.sample_rate as f64;
        if n.is_finite() && n > 0.0 {
            n.round() as usize
        } else {
            0
        }
    }

    /// Number of samples in one pulse.
    pub fn decay_len(&self) -> usize {
        (DECAY_WINDOW_SECS * self.sample_rate as f64).floor() as usize
    }

    /// Pulse shape for `energy`, one value per pulse sample.
    pub fn pulse(&self, energy: f64) -> Vec<f64> {
        let tau = DECAY_TIME_CONSTANT_SECS * self.sample_rate as f64;
        (0..self.decay_len())
            .map(|k| energy * (-(k as f64) / tau).exp())
            .collect()
    }

    /// Noise floor: `noise_level` plus independent jitter per sample.
    pub fn baseline<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        (0..self.signal_len())
            .map(|_| self.noise_level + rng.gen_range(-NOISE_JITTER..NOISE_JITTER))
            .collect()
    }

    /// Add the pulse of `event` onto `values`, truncated at the end.
    pub fn add_pulse(&self, values: &mut [f64], event: &EventRecord) -> Placement {
        if !event.has_energy() {
            assert_invariant(NON_POSITIVE_ENERGY, true, "energy-less event adds nothing", None);
            return Placement::NoEnergy;
        }
        let pos = (event.time * self.sample_rate as f64).floor();
        if !pos.is_finite() || pos < 0.0 || pos >= values.len() as f64 {
            assert_invariant(EVENT_OUT_OF_RANGE, true, "out-of-range event dropped", None);
            return Placement::OutOfRange;
        }
        let start = pos as usize;
        let end = (start + self.decay_len()).min(values.len());
        let pulse = self.pulse(event.energy);
        for (sample, p) in values[start..end].iter_mut().zip(&pulse) {
            *sample += p;
        }
        assert_invariant(PULSE_SUPERPOSED, end <= values.len(), "pulse stays inside the signal", None);
        Placement::Added {
            start,
            len: end - start,
        }
    }

    /// Synthesize the full signal for `events`.
    pub fn synthesize<R: Rng + ?Sized>(&self, events: &[EventRecord], rng: &mut R) -> Signal {
        let mut values = self.baseline(rng);
        for event in events {
            self.add_pulse(&mut values, event);
        }
        let rate = self.sample_rate as f64;
        let times: Vec<f64> = (0..values.len()).map(|i| i as f64 / rate).collect();
        assert_invariant(
            SIGNAL_LENGTH,
            values.len() == self.signal_len() && times.len() == values.len(),
            "signal length is rate * duration",
            None,
        );
        Signal {
            sample_rate: self.sample_rate,
            times,
            values,
        }
    }
}
