use raysonic::config::{GeneratorConfig, Mode};
use raysonic::event::EventRecord;
use raysonic::pitch::{calculate_pitch, read_pitch_log, write_pitch_csv, write_pitch_log, PitchProcessor};
use raysonic::source::CosmicRayGenerator;
use raysonic::stop::StopToken;
use std::fs;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn pitch_of_440() {
    let pitch = calculate_pitch(440.0);
    assert!((pitch - 440.0 * 2f64.powf(440f64.ln() / 12.0)).abs() < 1e-9);
    assert!(pitch > 440.0 && pitch < 880.0);
    assert_eq!(calculate_pitch(0.0), 0.0);
    assert_eq!(calculate_pitch(-1.0), 0.0);
}

#[test]
fn human_log_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pitch_log.txt");
    let events = vec![
        EventRecord::new(2.0, 1.0).with_altitude(2500.0),
        EventRecord::new(0.0, 0.0),
    ];
    write_pitch_log(&events, &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Time: 2.0, Energy: 1.0, Frequency: 0.50, Pitch: 440.00, Altitude: 2500.00",
            "Time: 0.0, Energy: 0.0, Frequency: 0.00, Pitch: 0.00",
        ]
    );
}

#[test]
fn csv_written_then_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pitch.csv");
    let events = vec![EventRecord::new(1.0, 2.3), EventRecord::new(4.5, 1.5)];
    write_pitch_csv(&events, &path).unwrap();
    let records = read_pitch_log(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].pitch, calculate_pitch(2.3));
    assert_eq!(records[1].time, 4.5);
}

#[test]
fn processor_tracks_event_log() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("event_log.txt");
    let out = dir.path().join("pitch_log.txt");
    let gen = CosmicRayGenerator::new(GeneratorConfig::new(Mode::File).with_event_log(&log)).unwrap();
    let processor = PitchProcessor::new(gen, &out).with_interval(Duration::from_millis(10));

    assert_eq!(processor.poll_once().unwrap(), 0);
    assert!(!out.exists());

    fs::write(&log, "time energy\n1.0 2.3\n4.5 1.5\n").unwrap();
    assert_eq!(processor.poll_once().unwrap(), 2);
    assert_eq!(fs::read_to_string(&out).unwrap().lines().count(), 2);
}

#[test]
fn processor_stops_cleanly() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("event_log.txt");
    fs::write(&log, "1.0 2.0\n").unwrap();
    let gen = CosmicRayGenerator::new(GeneratorConfig::new(Mode::File).with_event_log(&log)).unwrap();
    let processor = PitchProcessor::new(gen, dir.path().join("pitch_log.txt"))
        .with_interval(Duration::from_millis(5));
    let stop = StopToken::new();
    let remote = stop.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(60));
        remote.stop();
    });
    let updates = processor.run(&stop).unwrap();
    handle.join().unwrap();
    assert!(updates >= 1);
}
