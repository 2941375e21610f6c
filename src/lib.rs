//! Wavetable note playback through a lowpass → highpass → compressor →
//! reverb output chain.
//!
//! The crate is split the same way the signal flows:
//!
//! - [`dsp`]: allocation-free primitives (filter, envelope, compressor,
//!   reverb, wavetable).
//! - [`graph`]: composable nodes wrapping those primitives.
//! - [`instrument`]: tone descriptors, decoded sound banks, the loader and
//!   the registry.
//! - [`dispatch`]: the note dispatcher that turns a track/instrument/tone
//!   request into a scheduled voice.
//! - [`engine`]: the realtime side, owning voices and the [`output`] graph.
//! - [`session`]: one-call setup returning the engine/dispatcher pair.

pub mod analysis;
pub mod config;
pub mod dispatch;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod graph;
pub mod host;
pub mod instrument;
pub mod output;
pub mod session;

pub use config::PlaybackConfig;
pub use dispatch::{NoteDispatcher, NoteRequest, ScheduledNote};
pub use engine::PlaybackEngine;
pub use error::{Error, Result};
pub use instrument::{InstrumentRegistry, SoundBank, ToneDescriptor};
pub use session::{init, PendingSession, Session};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
