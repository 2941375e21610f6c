//! Benchmarks for one voice per built-in instrument, and the output graph.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use notewire::{
    config::ChainConfig,
    engine::voice::Voice,
    graph::node::RenderCtx,
    instrument::{builtin, SoundBank},
    output::OutputGraph,
};

use crate::BLOCK_SIZES;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let sample_rate = 48_000.0;

    for &size in BLOCK_SIZES {
        let mut mix = vec![0.0f32; size];
        let mut scratch = vec![0.0f32; size];

        for descriptor in builtin() {
            let bank = SoundBank::decode(&descriptor).expect("builtin decodes");
            let mut voice = Voice::new();

            group.bench_with_input(BenchmarkId::new(bank.name(), size), &size, |b, _| {
                b.iter(|| {
                    // Restart so the voice never frees mid-measurement
                    voice.start(&bank, 72, 0.5, 0, 48_000, 0);
                    voice.render_into(black_box(&mut mix), &mut scratch, sample_rate);
                })
            });
        }

        let input: Vec<f32> = (0..size).map(|i| 0.3 * (i as f32 * 0.07).sin()).collect();
        let mut output = OutputGraph::from_config(&ChainConfig::default()).expect("valid chain");
        let ctx = RenderCtx::effect(sample_rate);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("output_graph", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                output.process(black_box(&mut buffer), &ctx);
            })
        });
    }

    group.finish();
}
