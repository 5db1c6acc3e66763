//! Simulated ray generator: drives the rendezvous file with random pulses.
//!
//! Run alongside the `detector` demo pointed at the same file.

use clap::Parser;
use raysonic::{ContinuousSimulation, CosmicRayGenerator, GeneratorConfig, Mode, StopToken};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ray_generator")]
#[command(about = "Emit simulated cosmic rays through a rendezvous file", long_about = None)]
struct Args {
    /// Rendezvous file shared with the detector
    #[arg(long, value_name = "PATH", default_value = "ray_signal.txt")]
    signal_file: PathBuf,

    /// Stop after this many seconds
    #[arg(long, value_name = "SECONDS", default_value = "30")]
    seconds: u64,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = GeneratorConfig::new(Mode::HardwareSim).with_signal_file(&args.signal_file);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let mut generator = CosmicRayGenerator::new(config)?;

    let stop = StopToken::new();
    let timer = stop.clone();
    let seconds = args.seconds;
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(seconds));
        timer.stop();
    });

    info!("generator writing to {}", args.signal_file.display());
    let emitted = ContinuousSimulation::default().run(&mut generator, &stop, |_| {})?;
    info!("ray generator stopped after {} rays", emitted);
    Ok(())
}
