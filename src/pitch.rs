//! Energy to pitch mapping and the pitch log.

use crate::event::EventRecord;
use crate::source::CosmicRayGenerator;
use crate::stop::StopToken;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Reference pitch, in Hz, for an energy of 1.
pub const BASE_PITCH_HZ: f64 = 440.0;

/// Map energy to an audible frequency: `440 * 2^(ln(energy) / 12)`.
///
/// Non-positive (and NaN) energy maps to 0, meaning silence.
pub fn calculate_pitch(energy: f64) -> f64 {
    if energy.is_nan() || energy <= 0.0 {
        return 0.0;
    }
    BASE_PITCH_HZ * 2f64.powf(energy.ln() / 12.0)
}

/// An event with its derived frequency and pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchRecord {
    pub time: f64,
    pub energy: f64,
    /// `1 / time`, or 0 at time 0.
    pub frequency: f64,
    pub pitch: f64,
    pub altitude: Option<f64>,
}

impl PitchRecord {
    /// Derive frequency and pitch for `event`.
    pub fn from_event(event: &EventRecord) -> Self {
        Self {
            time: event.time,
            energy: event.energy,
            frequency: if event.time != 0.0 { 1.0 / event.time } else { 0.0 },
            pitch: calculate_pitch(event.energy),
            altitude: event.altitude,
        }
    }

    /// Human-readable log line.
    pub fn to_log_line(&self) -> String {
        let mut line = format!(
            "Time: {:?}, Energy: {:?}, Frequency: {:.2}, Pitch: {:.2}",
            self.time, self.energy, self.frequency, self.pitch
        );
        if let Some(alt) = self.altitude {
            let _ = write!(line, ", Altitude: {:.2}", alt);
        }
        line
    }
}

/// Failure reading or writing a pitch log.
#[derive(Debug, Error)]
#[error("pitch log {}: {source}", .path.display())]
pub struct PitchLogError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> PitchLogError + '_ {
    move |source| PitchLogError {
        path: path.to_path_buf(),
        source,
    }
}

/// Write the human-readable pitch log for `events`.
pub fn write_pitch_log(events: &[EventRecord], path: &Path) -> Result<(), PitchLogError> {
    let mut out = String::new();
    for event in events {
        out.push_str(&PitchRecord::from_event(event).to_log_line());
        out.push('\n');
    }
    fs::write(path, out).map_err(io_error(path))?;
    info!("generated pitch log with {} events", events.len());
    Ok(())
}

/// Write `time,energy,frequency,pitch` CSV for `events`.
pub fn write_pitch_csv(events: &[EventRecord], path: &Path) -> Result<(), PitchLogError> {
    let mut out = String::from("time,energy,frequency,pitch\n");
    for event in events {
        let r = PitchRecord::from_event(event);
        let _ = writeln!(out, "{:?},{:?},{},{}", r.time, r.energy, r.frequency, r.pitch);
    }
    fs::write(path, out).map_err(io_error(path))
}

/// Read a pitch CSV. A first row containing a `time` column is a header;
/// rows without exactly four numeric values are dropped.
pub fn read_pitch_log(path: &Path) -> Result<Vec<PitchRecord>, PitchLogError> {
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    Ok(parse_pitch_csv(&text))
}

/// Parse pitch CSV text; see [`read_pitch_log`].
pub fn parse_pitch_csv(text: &str) -> Vec<PitchRecord> {
    let mut lines = text.lines().peekable();
    let has_header = lines
        .peek()
        .map_or(false, |first| first.split(',').any(|h| h.trim().eq_ignore_ascii_case("time")));
    if has_header {
        lines.next();
    }
    lines.filter_map(parse_pitch_row).collect()
}

fn parse_pitch_row(line: &str) -> Option<PitchRecord> {
    let values: Vec<f64> = line
        .split(',')
        .map(|f| f.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match values[..] {
        [time, energy, frequency, pitch] => Some(PitchRecord {
            time,
            energy,
            frequency,
            pitch,
            altitude: None,
        }),
        _ => None,
    }
}

/// Polls an event log and keeps a pitch log in sync with it.
#[derive(Debug)]
pub struct PitchProcessor {
    generator: CosmicRayGenerator,
    output: PathBuf,
    interval: Duration,
}

impl PitchProcessor {
    /// `generator` supplies the event log path (file mode).
    pub fn new(generator: CosmicRayGenerator, output: impl Into<PathBuf>) -> Self {
        Self {
            generator,
            output: output.into(),
            interval: Duration::from_secs(2),
        }
    }

    /// Set the poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// One poll: rewrite the pitch log if the event log has events.
    ///
    /// Returns the number of events written.
    pub fn poll_once(&self) -> Result<usize, PitchLogError> {
        let events = self.generator.read_events_from_file();
        if events.is_empty() {
            return Ok(0);
        }
        write_pitch_log(&events, &self.output)?;
        Ok(events.len())
    }

    /// Poll until `stop` is raised. Returns the number of polls that
    /// rewrote the pitch log.
    pub fn run(&self, stop: &StopToken) -> Result<usize, PitchLogError> {
        info!("pitch processor started");
        let mut updates = 0;
        while !stop.is_stopped() {
            if self.poll_once()? > 0 {
                updates += 1;
            }
            stop.sleep(self.interval);
        }
        info!("pitch processor stopped");
        Ok(updates)
    }
}
