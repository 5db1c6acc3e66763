use raysonic::config::{GeneratorConfig, Mode};
use raysonic::rendezvous::Level;
use raysonic::simulation::{ContinuousSimulation, LoopState, SimulationConfig, SimulationError};
use raysonic::source::CosmicRayGenerator;
use raysonic::stop::StopToken;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn fast() -> SimulationConfig {
    SimulationConfig::with_backoff(Duration::from_millis(1), Duration::from_millis(5))
}

#[test]
fn simulated_loop_emits_until_stopped() {
    let cfg = GeneratorConfig::new(Mode::Simulated).with_seed(5);
    let mut gen = CosmicRayGenerator::new(cfg).unwrap();
    let stop = StopToken::new();
    let mut seen = Vec::new();
    let mut sim = ContinuousSimulation::new(fast());
    let emitted = sim
        .run(&mut gen, &stop, |ev| {
            seen.push(*ev);
            if seen.len() == 5 {
                stop.stop();
            }
        })
        .unwrap();
    assert_eq!(emitted, 5);
    assert_eq!(seen.len(), 5);
    assert_eq!(sim.state(), LoopState::Stopped);
    assert!(seen.iter().all(|ev| ev.has_energy() && ev.duration.is_some()));
}

#[test]
fn stop_cuts_backoff_short() {
    let mut gen = CosmicRayGenerator::new(GeneratorConfig::new(Mode::Simulated)).unwrap();
    let stop = StopToken::new();
    let remote = stop.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        remote.stop();
    });
    let started = Instant::now();
    let emitted = ContinuousSimulation::default()
        .run(&mut gen, &stop, |_| {})
        .unwrap();
    handle.join().unwrap();
    assert_eq!(emitted, 0);
    // Default backoff is at least two seconds.
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn file_and_predefined_modes_refuse_to_loop() {
    let dir = tempdir().unwrap();
    let stop = StopToken::new();
    let mut file_gen = CosmicRayGenerator::new(
        GeneratorConfig::new(Mode::File).with_event_log(dir.path().join("log.txt")),
    )
    .unwrap();
    let err = ContinuousSimulation::new(fast())
        .run(&mut file_gen, &stop, |_| {})
        .unwrap_err();
    assert!(matches!(err, SimulationError::UnsupportedMode(Mode::File)));

    let mut fixture = CosmicRayGenerator::new(GeneratorConfig::default()).unwrap();
    let err = ContinuousSimulation::new(fast())
        .run(&mut fixture, &stop, |_| {})
        .unwrap_err();
    assert!(matches!(err, SimulationError::UnsupportedMode(Mode::Predefined)));
}

#[test]
fn hardware_callback_runs_before_pulse_and_pulse_completes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ray_signal.txt");
    let cfg = GeneratorConfig::new(Mode::HardwareSim)
        .with_signal_file(&path)
        .with_seed(8);
    let mut gen = CosmicRayGenerator::new(cfg).unwrap();
    let channel = gen.channel().unwrap().clone();
    let stop = StopToken::new();

    let mut level_in_callback = None;
    let mut hold = 0.0;
    let started = Instant::now();
    ContinuousSimulation::new(fast())
        .run(&mut gen, &stop, |ev| {
            level_in_callback = Some(channel.read().unwrap());
            hold = ev.duration.unwrap();
            // Raised mid-iteration: the pulse that follows still runs.
            stop.stop();
        })
        .unwrap();

    assert_eq!(level_in_callback, Some(Level::Low));
    assert!(started.elapsed().as_secs_f64() >= hold);
    assert_eq!(channel.read().unwrap(), Level::Low);
}
