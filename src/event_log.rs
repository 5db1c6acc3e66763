//! Lenient event-log reader used by the file-replay source.
//!
//! Lines hold `time energy [altitude]`, separated by whitespace or commas.
//! Anything that does not parse (a header row, a short row, a non-numeric
//! field) is dropped without a report; a missing file reads as no events.

use crate::event::EventRecord;
use crate::invariant_ppt::{assert_invariant, LOG_ROW_DROPPED};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Read all well-formed events from `path`.
///
/// Rows without an altitude column get an altitude of `0`.
pub fn read_events_from_file(path: &Path) -> Vec<EventRecord> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            debug!("event log {} unreadable: {}", path.display(), e);
            return Vec::new();
        }
    };
    parse_events(&text)
}

/// Parse events from log text; see [`read_events_from_file`].
pub fn parse_events(text: &str) -> Vec<EventRecord> {
    let mut events = Vec::new();
    let mut rows = 0usize;
    let mut dropped = 0usize;
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        rows += 1;
        match parse_line(line) {
            Some(ev) => events.push(ev),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        assert_invariant(
            LOG_ROW_DROPPED,
            events.len() + dropped == rows,
            "every row is either kept or dropped",
            None,
        );
    }
    events
}

/// Parse one `time energy [altitude]` line.
pub fn parse_line(line: &str) -> Option<EventRecord> {
    let mut fields = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|f| !f.is_empty());
    let time = fields.next()?.parse::<f64>().ok()?;
    let energy = fields.next()?.parse::<f64>().ok()?;
    let altitude = match fields.next() {
        Some(f) => f.parse::<f64>().ok()?,
        None => 0.0,
    };
    Some(EventRecord::new(time, energy).with_altitude(altitude))
}
