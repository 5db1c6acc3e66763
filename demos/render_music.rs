//! Render a pitch CSV to a WAV file.

use clap::Parser;
use raysonic::audio::{create_music, Layout, RenderConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "render_music")]
#[command(about = "Turn a pitch/frequency log into tones", long_about = None)]
struct Args {
    /// Pitch CSV (time,energy,frequency,pitch)
    #[arg(long, value_name = "PATH", default_value = "pitch_frequency_log.csv")]
    input: PathBuf,

    /// Output WAV file
    #[arg(long, value_name = "PATH", default_value = "cosmic_ray_music.wav")]
    output: PathBuf,

    /// Place tones at their timestamps instead of back to back
    #[arg(long)]
    overlay: bool,

    /// Tone length in milliseconds
    #[arg(long, value_name = "MS", default_value = "500")]
    tone_ms: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = RenderConfig {
        tone_ms: args.tone_ms,
        layout: if args.overlay { Layout::Overlay } else { Layout::Sequential },
        ..RenderConfig::default()
    };
    let tones = create_music(&args.input, &args.output, &config)?;
    println!("Rendered {} tones to {}", tones, args.output.display());
    Ok(())
}
