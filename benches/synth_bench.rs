use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use raysonic::event::EventRecord;
use raysonic::source::predefined_events;
use raysonic::synth::SignalSynthesizer;

fn bench_synthesize_predefined(c: &mut Criterion) {
    let synth = SignalSynthesizer::new(100, 10.0, 0.05);
    let events = predefined_events();
    let mut rng = StdRng::seed_from_u64(0);

    c.bench_function("synthesize_predefined_100hz", |b| {
        b.iter(|| black_box(synth.synthesize(black_box(&events), &mut rng)))
    });
}

fn bench_synthesize_dense(c: &mut Criterion) {
    // Audio-rate window with a pulse every 10 ms: heavy overlap.
    let synth = SignalSynthesizer::new(44100, 10.0, 0.05);
    let events: Vec<EventRecord> = (0..1000)
        .map(|i| EventRecord::new(i as f64 * 0.01, 1.0 + (i % 9) as f64))
        .collect();
    let mut rng = StdRng::seed_from_u64(0);

    c.bench_function("synthesize_dense_44k", |b| {
        b.iter(|| black_box(synth.synthesize(black_box(&events), &mut rng)))
    });
}

criterion_group!(benches, bench_synthesize_predefined, bench_synthesize_dense);
criterion_main!(benches);
