//! Live display consumer: a clock plus a running list of detections.
//!
//! All animation state lives in [`LiveDisplay`]; a front-end calls
//! [`LiveDisplay::tick`] on its timer and draws what comes back.

use crate::event::EventRecord;
use chrono::{DateTime, Duration as ChronoDuration, SubsecRound, Utc};

/// Seconds of simulated time per frame.
pub const TIME_STEP: f64 = 0.1;

/// What changed on one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Frame time in seconds from the start.
    pub time: f64,
    /// `YYYY-MM-DD\nHH:MM:SS UTC`.
    pub clock: String,
    /// Lines for events revealed on this frame.
    pub new_detections: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LiveDisplay {
    start: DateTime<Utc>,
    events: Vec<EventRecord>,
    window: f64,
    shown: Vec<bool>,
    detections: Vec<String>,
}

impl LiveDisplay {
    /// Display for `events` over `window` seconds, clock starting at `start`.
    pub fn new(events: Vec<EventRecord>, window: f64, start: DateTime<Utc>) -> Self {
        let shown = vec![false; events.len()];
        Self {
            start,
            events,
            window,
            shown,
            detections: Vec::new(),
        }
    }

    /// Start the clock at the current whole second.
    pub fn starting_now(events: Vec<EventRecord>, window: f64) -> Self {
        Self::new(events, window, Utc::now().trunc_subsecs(0))
    }

    /// Number of frames covering the window.
    pub fn frame_count(&self) -> usize {
        (self.window / TIME_STEP).round() as usize
    }

    /// Every detection line revealed so far, oldest first.
    pub fn detections(&self) -> &[String] {
        &self.detections
    }

    /// Advance to `frame`. Returns `None` past the end of the window.
    pub fn tick(&mut self, frame: usize) -> Option<Frame> {
        let t = frame as f64 * TIME_STEP;
        if t > self.window {
            return None;
        }
        let mut new_detections = Vec::new();
        for (i, event) in self.events.iter().enumerate() {
            if !self.shown[i] && (event.time - t).abs() < TIME_STEP {
                self.shown[i] = true;
                let line = self.detection_line(event);
                self.detections.push(line.clone());
                new_detections.push(line);
            }
        }
        Some(Frame {
            time: t,
            clock: self.at(t).format("%Y-%m-%d\n%H:%M:%S UTC").to_string(),
            new_detections,
        })
    }

    fn at(&self, seconds: f64) -> DateTime<Utc> {
        self.start + ChronoDuration::milliseconds((seconds * 1000.0).round() as i64)
    }

    fn detection_line(&self, event: &EventRecord) -> String {
        let mut line = format!(
            "{} | {:.1} keV",
            self.at(event.time).format("%H:%M:%S"),
            event.energy
        );
        if let Some(alt) = event.altitude {
            line.push_str(&format!(" | Alt: {:.0}m", alt));
        }
        line
    }
}
