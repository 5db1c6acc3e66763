//! Continuous simulation loop.
//!
//! Idle -> Waiting (random backoff) -> Emit -> [Pulse -> Reset] -> Waiting ...
//!
//! The stop token is checked at the top of every Waiting phase. A stop
//! raised during the backoff cuts the wait short; a stop raised during a
//! pulse is only seen after the channel is back low.

use crate::config::Mode;
use crate::event::EventRecord;
use crate::invariant_ppt::{assert_invariant, CALLBACK_BEFORE_PULSE, STOP_OBSERVED};
use crate::rendezvous::ChannelError;
use crate::source::CosmicRayGenerator;
use crate::stop::StopToken;
use rand::Rng;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Phase of the continuous loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Waiting,
    Emit,
    Pulse,
    Reset,
    Stopped,
}

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Shortest pause between events.
    pub min_backoff: Duration,
    /// Longest pause between events.
    pub max_backoff: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl SimulationConfig {
    /// Custom pause range; `max` below `min` collapses to `min`.
    pub fn with_backoff(min: Duration, max: Duration) -> Self {
        Self {
            min_backoff: min,
            max_backoff: max.max(min),
        }
    }

    fn draw_backoff<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let lo = self.min_backoff.as_secs_f64();
        let hi = self.max_backoff.as_secs_f64();
        if hi > lo {
            Duration::from_secs_f64(rng.gen_range(lo..hi))
        } else {
            self.min_backoff
        }
    }
}

/// Failure of the continuous loop.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("continuous simulation needs 'simulated' or 'hardware_sim' mode, got '{0}'")]
    UnsupportedMode(Mode),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// Drives a generator until stopped.
#[derive(Debug, Clone)]
pub struct ContinuousSimulation {
    config: SimulationConfig,
    state: LoopState,
}

impl ContinuousSimulation {
    /// Loop with the given timing, starting Idle.
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            state: LoopState::Idle,
        }
    }

    /// Current phase of the loop.
    pub fn state(&self) -> LoopState {
        self.state
    }

    fn enter(&mut self, next: LoopState) {
        debug!("loop {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Emit random events until `stop` is raised, handing each one to
    /// `on_event` before its pulse is asserted.
    ///
    /// Returns the number of events emitted.
    pub fn run<F>(
        &mut self,
        generator: &mut CosmicRayGenerator,
        stop: &StopToken,
        mut on_event: F,
    ) -> Result<usize, SimulationError>
    where
        F: FnMut(&EventRecord),
    {
        let mode = generator.mode();
        if !matches!(mode, Mode::Simulated | Mode::HardwareSim) {
            return Err(SimulationError::UnsupportedMode(mode));
        }
        let channel = generator.channel().cloned();
        self.enter(LoopState::Idle);
        let mut emitted = 0usize;

        loop {
            self.enter(LoopState::Waiting);
            if stop.is_stopped() {
                self.enter(LoopState::Stopped);
                assert_invariant(STOP_OBSERVED, stop.is_stopped(), "stopped only on request", None);
                info!("simulation stopped after {} events", emitted);
                return Ok(emitted);
            }
            let backoff = self.config.draw_backoff(generator.rng());
            if !stop.sleep(backoff) {
                continue;
            }

            self.enter(LoopState::Emit);
            let event = generator.generate_random_event();
            on_event(&event);
            emitted += 1;

            if let Some(channel) = &channel {
                assert_invariant(
                    CALLBACK_BEFORE_PULSE,
                    self.state == LoopState::Emit,
                    "event delivered before pulse",
                    None,
                );
                let hold = Duration::from_secs_f64(event.duration.unwrap_or(0.0).max(0.0));
                self.enter(LoopState::Pulse);
                channel.pulse(hold)?;
                self.enter(LoopState::Reset);
            }

            info!(
                "Ray: Energy={:.2}, Duration={:.2}s",
                event.energy,
                event.duration.unwrap_or(0.0)
            );
        }
    }
}

impl Default for ContinuousSimulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
