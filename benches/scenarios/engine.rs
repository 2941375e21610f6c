//! Benchmarks for the engine with two tracks of chords sounding.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use notewire::PlaybackConfig;

use crate::BLOCK_SIZES;

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        for voices in [4, 16] {
            let session = notewire::init(&PlaybackConfig::default())
                .expect("valid config")
                .wait()
                .expect("instruments decode");
            let (mut engine, mut dispatcher) = session.into_parts();

            for n in 0..voices {
                let (track, instrument) = if n % 2 == 0 {
                    (0, "Piano")
                } else {
                    (1, "Guitar")
                };
                // Long enough to stay gated for the whole run
                dispatcher.play_note(track, instrument, (n * 3) as i32 % 12, 600.0);
            }

            let mut buffer = vec![0.0f32; size];
            engine.render_block(&mut buffer);

            let id = BenchmarkId::new(format!("{voices}_voices"), size);
            group.bench_with_input(id, &size, |b, _| {
                b.iter(|| engine.render_block(black_box(&mut buffer)))
            });
        }
    }

    group.finish();
}
