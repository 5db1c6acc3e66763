//! Text rendition of the live detection display.

use clap::Parser;
use raysonic::display::{LiveDisplay, TIME_STEP};
use raysonic::{CosmicRayGenerator, GeneratorConfig, Mode, StopToken};
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "live_display")]
#[command(about = "Replay events as a live detection feed", long_about = None)]
struct Args {
    /// Event mode: simulated, predefined or file
    #[arg(long, default_value = "predefined")]
    mode: Mode,

    /// Event log for file mode
    #[arg(long, value_name = "PATH")]
    event_log: Option<std::path::PathBuf>,

    /// Stop after this many seconds
    #[arg(long, value_name = "SECONDS", default_value = "10")]
    seconds: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = GeneratorConfig::new(args.mode);
    if let Some(log) = &args.event_log {
        config = config.with_event_log(log);
    }
    let mut generator = CosmicRayGenerator::new(config)?;
    let window = generator.config().duration;
    let mut display = LiveDisplay::starting_now(generator.get_events(), window);

    let stop = StopToken::new();
    let timer = stop.clone();
    let seconds = args.seconds;
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(seconds));
        timer.stop();
    });

    let mut frame = 0;
    while let Some(f) = display.tick(frame) {
        if frame % 10 == 0 {
            println!("{}", f.clock.replace('\n', " "));
        }
        for line in &f.new_detections {
            println!("  {}", line);
        }
        if !stop.sleep(Duration::from_secs_f64(TIME_STEP)) {
            break;
        }
        frame += 1;
    }
    println!("{} detections", display.detections().len());
    Ok(())
}
