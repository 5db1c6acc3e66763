//! Synthesize a decaying-pulse signal and write it as audio.

use clap::Parser;
use raysonic::audio::{signal_to_samples, write_wav};
use raysonic::synth::DEFAULT_SAMPLE_RATE;
use raysonic::{CosmicRayGenerator, GeneratorConfig, Mode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "synth_signal")]
#[command(about = "Render a synthesized ray signal to WAV", long_about = None)]
struct Args {
    /// Event mode: simulated, predefined or file
    #[arg(long, default_value = "simulated")]
    mode: Mode,

    /// Event log for file mode
    #[arg(long, value_name = "PATH")]
    event_log: Option<PathBuf>,

    /// Window length in seconds
    #[arg(long, value_name = "SECONDS", default_value = "10")]
    seconds: f64,

    /// Sample rate of the synthesized signal
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,

    /// Output WAV file
    #[arg(long, value_name = "PATH", default_value = "ray_signal.wav")]
    output: PathBuf,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = GeneratorConfig::new(args.mode).with_duration(args.seconds);
    if let Some(log) = &args.event_log {
        config = config.with_event_log(log);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let mut generator = CosmicRayGenerator::new(config)?;
    let signal = generator.generate_signal(args.sample_rate);
    println!(
        "{} samples, peak {:.3}, mean {:.3}",
        signal.len(),
        signal.peak(),
        signal.mean()
    );
    write_wav(&signal_to_samples(&signal), args.sample_rate, &args.output)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
