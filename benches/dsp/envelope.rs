//! Benchmarks for the ADSR envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use notewire::dsp::envelope::Envelope;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let sample_rate = 48_000.0;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Held note, mostly in sustain
        let mut env = Envelope::adsr(0.005, 1.2, 0.2, 0.4);
        env.gate_on();
        group.bench_with_input(BenchmarkId::new("held", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer), black_box(sample_rate)))
        });

        // Retriggered every block, always in attack/decay
        let mut env = Envelope::adsr(0.001, 0.25, 0.0, 0.1);
        group.bench_with_input(BenchmarkId::new("struck", size), &size, |b, _| {
            b.iter(|| {
                env.gate_on();
                env.render(black_box(&mut buffer), black_box(sample_rate));
            })
        });
    }

    group.finish();
}
