//! Low-level DSP primitives used by the graph nodes.
//!
//! Everything here is allocation-free once constructed, so the realtime
//! thread can own these structs directly. Orchestration lives one layer up
//! in [`crate::graph`].

/// Feed-forward compressor with a soft knee.
pub mod dynamics;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// State-variable filter (lowpass and highpass responses).
pub mod filter;
/// Schroeder room reverb.
pub mod reverb;
/// Single-cycle wavetables rendered from harmonic partials.
pub mod wavetable;

pub use envelope::{EnvelopeShape, EnvelopeStage};
