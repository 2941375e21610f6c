//! Benchmarks for low-level DSP primitives.

mod dynamics;
mod envelope;
mod filter;
mod reverb;
mod wavetable;

pub use dynamics::bench_dynamics;
pub use envelope::bench_envelope;
pub use filter::bench_filter;
pub use reverb::bench_reverb;
pub use wavetable::bench_wavetable;
