//! Scenario benchmarks: single voices, the output graph and the whole
//! engine with several tracks playing.

mod engine;
mod voices;

pub use engine::bench_engine;
pub use voices::bench_voices;
