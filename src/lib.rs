#![forbid(unsafe_code)]

pub mod audio;
pub mod config;
pub mod display;
pub mod event;
pub mod event_log;
#[doc(hidden)]
pub mod harness;
#[doc(hidden)]
pub mod invariant_ppt;
pub mod pitch;
pub mod rendezvous;
pub mod simulation;
pub mod source;
pub mod stop;
pub mod synth;
pub mod tabular;

pub use config::{ConfigError, GeneratorConfig, Mode};
pub use event::EventRecord;
pub use rendezvous::{ChannelError, Detection, Detector, DetectorConfig, Level, RendezvousChannel};
pub use simulation::{ContinuousSimulation, LoopState, SimulationConfig, SimulationError};
pub use source::{CosmicRayGenerator, EventSource, GeneratorError};
pub use stop::StopToken;
pub use synth::{Signal, SignalSynthesizer};
