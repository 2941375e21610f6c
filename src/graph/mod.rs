//! Composable building blocks for voices and the output chain.
//!
//! Graph nodes wrap the DSP primitives with what playback needs: note
//! events, block rendering and chaining. [`extensions::NodeExt`] adds the
//! fluent `.amplify()` / `.through()` combinators used to assemble both
//! voices and the output graph.

/// Multiply a signal by a modulator (envelopes shaping amplitude).
pub mod amplify;
/// Compressor node.
pub mod compressor;
/// Envelope generator node.
pub mod envelope;
/// Fluent combinators.
pub mod extensions;
/// Lowpass / highpass filter node.
pub mod filter;
/// Core traits shared by all graph nodes.
pub mod node;
/// Room reverb with dry/wet mix.
pub mod reverb;
/// Serial chaining of two nodes (source → effect).
pub mod through;
/// Wavetable playback node.
pub mod wavetable;

pub use node::{pitch_to_hz, GraphNode, RenderCtx};
