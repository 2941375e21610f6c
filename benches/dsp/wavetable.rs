//! Benchmarks for wavetable playback and table building.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use notewire::{
    dsp::wavetable::{TablePhase, Wavetable},
    instrument::builtin,
};

use crate::BLOCK_SIZES;

pub fn bench_wavetable(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/wavetable");
    let sample_rate = 48_000.0;
    let piano = builtin()
        .into_iter()
        .find(|d| d.name == "Piano")
        .expect("builtin piano");

    group.bench_function("build_piano_table", |b| {
        b.iter(|| Wavetable::from_partials(black_box(&piano.partials)))
    });

    let table = Wavetable::from_partials(&piano.partials).expect("audible table");
    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut phase = TablePhase::default();
        group.bench_with_input(BenchmarkId::new("read_c5", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = phase.next(&table, black_box(523.25), sample_rate);
                }
            })
        });
    }

    group.finish();
}
