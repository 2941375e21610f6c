//! Benchmarks for the compressor.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use notewire::dsp::dynamics::{Compressor, CompressorSettings};

use crate::BLOCK_SIZES;

pub fn bench_dynamics(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/dynamics");
    let sample_rate = 48_000.0;

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| 0.8 * (i as f32 * 0.06).sin())
            .collect();

        let mut comp = Compressor::new(CompressorSettings::default(), sample_rate);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("soft_knee", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                comp.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
