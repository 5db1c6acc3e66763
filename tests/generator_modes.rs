use raysonic::config::{ConfigError, GeneratorConfig, Mode};
use raysonic::event::{DURATION_PER_ENERGY, SIM_ALTITUDE_RANGE, SIM_ENERGY_RANGE};
use raysonic::source::{CosmicRayGenerator, GeneratorError, SIM_EVENT_COUNT};

#[test]
fn unknown_mode_fails_construction() {
    for tag in ["hardware", "replay", "", "PREDEFINED"] {
        assert_eq!(tag.parse::<Mode>(), Err(ConfigError::InvalidMode(tag.to_string())));
    }
}

#[test]
fn required_paths_are_enforced() {
    let err = CosmicRayGenerator::new(GeneratorConfig::new(Mode::File)).unwrap_err();
    assert!(matches!(err, GeneratorError::Config(ConfigError::MissingEventLog)));
    let err = CosmicRayGenerator::new(GeneratorConfig::new(Mode::HardwareSim)).unwrap_err();
    assert!(matches!(err, GeneratorError::Config(ConfigError::MissingSignalFile)));
    let err = CosmicRayGenerator::new(GeneratorConfig::new(Mode::File).with_event_log("")).unwrap_err();
    assert!(matches!(err, GeneratorError::Config(ConfigError::MissingEventLog)));
}

#[test]
fn unchecked_construction_falls_back_to_defaults() {
    let gen = CosmicRayGenerator::new_unchecked(GeneratorConfig::new(Mode::File)).unwrap();
    assert_eq!(gen.config().event_log_or_default().to_str(), Some("event_log.txt"));
}

#[test]
fn predefined_events_are_bit_identical() {
    let mut gen = CosmicRayGenerator::new(GeneratorConfig::default()).unwrap();
    let first = gen.get_predefined_events();
    assert_eq!(first.len(), 4);
    for _ in 0..10 {
        let again = gen.get_predefined_events();
        for (a, b) in first.iter().zip(&again) {
            assert_eq!(a.time.to_bits(), b.time.to_bits());
            assert_eq!(a.energy.to_bits(), b.energy.to_bits());
        }
        assert_eq!(gen.get_events(), first);
    }
}

#[test]
fn simulated_batch_is_evenly_spaced() {
    let cfg = GeneratorConfig::new(Mode::Simulated).with_duration(10.0).with_seed(3);
    let mut gen = CosmicRayGenerator::new(cfg).unwrap();
    for _ in 0..20 {
        let events = gen.get_events();
        assert!(SIM_EVENT_COUNT.contains(&events.len()));
        for (i, ev) in events.iter().enumerate() {
            assert!((ev.time - i as f64).abs() < 1e-12);
            assert!(SIM_ENERGY_RANGE.contains(&ev.energy));
            assert!(SIM_ALTITUDE_RANGE.contains(&ev.altitude.unwrap()));
            let duration = ev.duration.unwrap();
            assert!((duration - ev.energy * DURATION_PER_ENERGY).abs() < 1e-12);
        }
    }
}

#[test]
fn generated_signal_uses_window() {
    let cfg = GeneratorConfig::new(Mode::Predefined).with_duration(10.0).with_seed(1);
    let mut gen = CosmicRayGenerator::new(cfg).unwrap();
    let signal = gen.generate_signal(100);
    assert_eq!(signal.len(), 1000);
    // Predefined event at t=1.0, E=2.3 lands on sample 100.
    assert!(signal.values[100] > 2.3);
}
