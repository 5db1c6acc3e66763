//! Keeps a pitch log in sync with an event log.

use clap::Parser;
use raysonic::pitch::PitchProcessor;
use raysonic::{CosmicRayGenerator, GeneratorConfig, Mode, StopToken};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "pitch_processor")]
#[command(about = "Convert logged ray energies to pitches", long_about = None)]
struct Args {
    /// Event log to watch
    #[arg(long, value_name = "PATH", default_value = "event_log.txt")]
    event_log: PathBuf,

    /// Pitch log to rewrite
    #[arg(long, value_name = "PATH", default_value = "pitch_log.txt")]
    output: PathBuf,

    /// Poll interval in seconds
    #[arg(long, value_name = "SECONDS", default_value = "2")]
    interval: u64,

    /// Stop after this many seconds
    #[arg(long, value_name = "SECONDS", default_value = "30")]
    seconds: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let generator = CosmicRayGenerator::new(GeneratorConfig::new(Mode::File).with_event_log(&args.event_log))?;
    let processor = PitchProcessor::new(generator, &args.output)
        .with_interval(Duration::from_secs(args.interval));

    let stop = StopToken::new();
    let timer = stop.clone();
    let seconds = args.seconds;
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(seconds));
        timer.stop();
    });

    processor.run(&stop)?;
    Ok(())
}
