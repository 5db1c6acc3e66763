//! Detector side of the rendezvous handshake.

use clap::Parser;
use raysonic::{Detector, DetectorConfig, RendezvousChannel, StopToken};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "detector")]
#[command(about = "Poll a rendezvous file and report pulses", long_about = None)]
struct Args {
    /// Rendezvous file shared with the generator
    #[arg(long, value_name = "PATH", default_value = "ray_signal.txt")]
    signal_file: PathBuf,

    /// Idle poll interval in milliseconds
    #[arg(long, value_name = "MS", default_value = "10")]
    poll_ms: u64,

    /// Stop after this many seconds
    #[arg(long, value_name = "SECONDS", default_value = "30")]
    seconds: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = DetectorConfig {
        poll_interval: Duration::from_millis(args.poll_ms),
        ..DetectorConfig::default()
    };
    let detector = Detector::new(RendezvousChannel::open(&args.signal_file)?, config);

    let stop = StopToken::new();
    let timer = stop.clone();
    let seconds = args.seconds;
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(seconds));
        timer.stop();
    });

    detector.run(&stop, |d| {
        println!(
            "Ray detected! Duration: {:.5}s, Energy: {:.2}",
            d.duration.as_secs_f64(),
            d.energy
        );
    })?;
    Ok(())
}
