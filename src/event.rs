//! Event module: the immutable cosmic-ray detection record.

use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Energy range for simulated events (arbitrary unit, upper bound exclusive).
pub const SIM_ENERGY_RANGE: std::ops::Range<f64> = 1.0..10.0;
/// Altitude range for simulated events, in meters.
pub const SIM_ALTITUDE_RANGE: std::ops::Range<f64> = 2000.0..3000.0;
/// Simulated pulse duration per unit of energy, in seconds.
pub const DURATION_PER_ENERGY: f64 = 0.1;

/// A single detected (or simulated) cosmic-ray occurrence.
///
/// Records are plain values: once produced by a source they are only
/// ever copied. Energy is not validated here; synthesis treats
/// non-positive energy as "no pulse".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRecord {
    /// Event time in seconds.
    pub time: f64,
    /// Event energy, arbitrary unit.
    pub energy: f64,
    /// Altitude in meters, when known.
    pub altitude: Option<f64>,
    /// Pulse duration in seconds, when known.
    pub duration: Option<f64>,
}

impl EventRecord {
    /// Create a bare record with no altitude or duration.
    pub fn new(time: f64, energy: f64) -> Self {
        Self {
            time,
            energy,
            altitude: None,
            duration: None,
        }
    }

    /// Attach an altitude.
    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// Attach a pulse duration.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Draw a random event stamped with the caller's `time`.
    ///
    /// Energy is uniform in [1, 10), altitude uniform in [2000, 3000),
    /// duration is `energy / 10`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, time: f64) -> Self {
        let energy = rng.gen_range(SIM_ENERGY_RANGE);
        let altitude = rng.gen_range(SIM_ALTITUDE_RANGE);
        Self::new(time, energy)
            .with_altitude(altitude)
            .with_duration(energy * DURATION_PER_ENERGY)
    }

    /// Draw a random event stamped with the current wall-clock time.
    pub fn now_random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::random(rng, unix_now())
    }

    /// Whether this event can add a pulse to a signal.
    pub fn has_energy(&self) -> bool {
        self.energy.is_finite() && self.energy > 0.0
    }
}

/// Seconds since the Unix epoch as a float.
pub(crate) fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
