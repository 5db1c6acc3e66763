//! Audio rendering: pitch records to tones, signals to samples, WAV export.

use crate::pitch::{read_pitch_log, PitchLogError, PitchRecord};
use crate::synth::Signal;
use std::f64::consts::TAU;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Latest tone start accepted by the overlay layout, in seconds.
pub const MAX_OVERLAY_SECS: f64 = 3600.0;

/// How tones are placed in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One tone after another, in record order.
    #[default]
    Sequential,
    /// Each tone starts at its record's timestamp; overlaps sum.
    Overlay,
}

/// Audio rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Length of each tone in milliseconds.
    pub tone_ms: u32,
    pub layout: Layout,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            tone_ms: 500,
            layout: Layout::Sequential,
        }
    }
}

impl RenderConfig {
    fn tone_len(&self) -> usize {
        (self.sample_rate as u64 * self.tone_ms as u64 / 1000) as usize
    }
}

/// Audio rendering or export failure.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("sample rate must be positive")]
    InvalidSampleRate,
    #[error("timestamp {0} s cannot be placed in the overlay window")]
    TimestampOutOfRange(f64),
    #[error("input {} not found", .0.display())]
    MissingInput(PathBuf),
    #[error(transparent)]
    PitchLog(#[from] PitchLogError),
    #[error("failed to write {}: {source}", .path.display())]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
}

/// A full-scale sine tone of `pitch` Hz, or silence when `pitch <= 0`.
pub fn tone(pitch: f64, duration_ms: u32, sample_rate: u32) -> Vec<f32> {
    let len = (sample_rate as u64 * duration_ms as u64 / 1000) as usize;
    if pitch.is_nan() || pitch <= 0.0 || sample_rate == 0 {
        return vec![0.0; len];
    }
    let step = TAU * pitch / sample_rate as f64;
    (0..len).map(|i| (step * i as f64).sin() as f32).collect()
}

/// Concatenate one tone per record.
pub fn render_sequential(records: &[PitchRecord], config: &RenderConfig) -> Vec<f32> {
    let mut out = Vec::with_capacity(records.len() * config.tone_len());
    for record in records {
        out.extend(tone(record.pitch, config.tone_ms, config.sample_rate));
    }
    out
}

/// Place each record's tone at its timestamp, summing overlaps.
/// Negative timestamps start at 0. Non-finite timestamps and starts past
/// [`MAX_OVERLAY_SECS`] are rejected.
pub fn render_overlay(records: &[PitchRecord], config: &RenderConfig) -> Result<Vec<f32>, AudioError> {
    let rate = config.sample_rate as f64;
    let tone_len = config.tone_len();
    let mut offsets = Vec::with_capacity(records.len());
    let mut total = 0usize;
    for record in records {
        if !record.time.is_finite() || record.time > MAX_OVERLAY_SECS {
            return Err(AudioError::TimestampOutOfRange(record.time));
        }
        let start = (record.time.max(0.0) * rate).round() as usize;
        let end = start
            .checked_add(tone_len)
            .ok_or(AudioError::TimestampOutOfRange(record.time))?;
        total = total.max(end);
        offsets.push(start);
    }
    let mut out = vec![0.0f32; total];
    for (record, start) in records.iter().zip(offsets) {
        let t = tone(record.pitch, config.tone_ms, config.sample_rate);
        for (o, s) in out[start..start + t.len()].iter_mut().zip(&t) {
            *o += s;
        }
    }
    Ok(out)
}

/// Render `records` with the configured layout.
pub fn render(records: &[PitchRecord], config: &RenderConfig) -> Result<Vec<f32>, AudioError> {
    match config.layout {
        Layout::Sequential => Ok(render_sequential(records, config)),
        Layout::Overlay => render_overlay(records, config),
    }
}

/// Scale a synthesized signal into [-1, 1] by its peak.
pub fn signal_to_samples(signal: &Signal) -> Vec<f32> {
    let peak = signal.peak();
    if peak == 0.0 {
        return vec![0.0; signal.len()];
    }
    signal.values.iter().map(|v| (v / peak) as f32).collect()
}

/// Write mono 16-bit PCM. Buffers peaking above full scale are
/// normalized first; everything is clamped to [-1, 1].
pub fn write_wav(samples: &[f32], sample_rate: u32, path: &Path) -> Result<(), AudioError> {
    if sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate);
    }
    let wav_err = |source: hound::Error| AudioError::Wav {
        path: path.to_path_buf(),
        source,
    };
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    let gain = if peak > 1.0 { 1.0 / peak } else { 1.0 };

    let mut writer = hound::WavWriter::create(path, spec).map_err(wav_err)?;
    for &sample in samples {
        let clamped = (sample * gain).clamp(-1.0, 1.0);
        writer
            .write_sample((clamped * i16::MAX as f32) as i16)
            .map_err(wav_err)?;
    }
    writer.finalize().map_err(wav_err)?;
    Ok(())
}

/// Read a pitch CSV, render it and export a WAV. Returns the number of
/// tones rendered.
pub fn create_music(input: &Path, output: &Path, config: &RenderConfig) -> Result<usize, AudioError> {
    if !input.exists() {
        return Err(AudioError::MissingInput(input.to_path_buf()));
    }
    let records = read_pitch_log(input)?;
    let samples = render(&records, config)?;
    write_wav(&samples, config.sample_rate, output)?;
    info!("music generated and saved to {}", output.display());
    Ok(records.len())
}
