//! Instruments: tone descriptors, decoded sound banks, loading and lookup.
//!
//! A [`ToneDescriptor`] is the serializable recipe for a timbre. Decoding it
//! produces a [`SoundBank`]: a normalised single-cycle wavetable plus the
//! amplitude envelope every note of that instrument follows. Banks are
//! decoded off the calling thread by the [`loader`] and collected into an
//! [`InstrumentRegistry`] once every decode has finished.

pub mod loader;
pub mod registry;

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{
        envelope::EnvelopeShape,
        wavetable::{Partial, Wavetable},
    },
    error::{Error, Result},
};

pub use loader::{InstrumentLoader, PendingInstruments, Readiness};
pub use registry::InstrumentRegistry;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ToneDescriptor {
    /// Display name callers use to pick the instrument.
    pub name: String,
    /// General MIDI program number the timbre stands in for.
    pub program: u8,
    pub partials: Vec<Partial>,
    pub envelope: EnvelopeShape,
}

impl ToneDescriptor {
    pub fn new(
        name: impl Into<String>,
        program: u8,
        partials: Vec<Partial>,
        envelope: EnvelopeShape,
    ) -> Self {
        Self {
            name: name.into(),
            program,
            partials,
            envelope,
        }
    }
}

/// A decoded instrument timbre, shared between the registry and voices.
#[derive(Debug)]
pub struct SoundBank {
    name: String,
    program: u8,
    table: Arc<Wavetable>,
    envelope: EnvelopeShape,
}

impl SoundBank {
    pub fn decode(descriptor: &ToneDescriptor) -> Result<Self> {
        let decode_error = |reason: &str| Error::Decode {
            name: descriptor.name.clone(),
            reason: reason.to_owned(),
        };

        if descriptor.name.trim().is_empty() {
            return Err(decode_error("instrument name is empty"));
        }
        if descriptor
            .partials
            .iter()
            .any(|p| !p.amplitude.is_finite())
        {
            return Err(decode_error("partial amplitude is not finite"));
        }

        let envelope = descriptor.envelope;
        let times = [envelope.attack, envelope.decay, envelope.release];
        if times.iter().any(|t| !t.is_finite() || *t < 0.0) || !envelope.sustain.is_finite() {
            return Err(decode_error("envelope times must be finite and non-negative"));
        }

        let table = Wavetable::from_partials(&descriptor.partials)
            .ok_or_else(|| decode_error("partials produce a silent table"))?;

        Ok(Self {
            name: descriptor.name.clone(),
            program: descriptor.program,
            table: Arc::new(table),
            envelope: envelope.sanitized(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> u8 {
        self.program
    }

    pub fn table(&self) -> &Arc<Wavetable> {
        &self.table
    }

    pub fn envelope(&self) -> EnvelopeShape {
        self.envelope
    }
}

/// The four instruments available out of the box.
///
/// | name      | GM program | character                          |
/// | --------- | ---------- | ---------------------------------- |
/// | Xylophone | 13         | hard mallet, bright odd partials   |
/// | Marimba   | 12         | soft mallet, strong 4th partial    |
/// | Guitar    | 24         | nylon pluck, falling harmonics     |
/// | Piano     | 0          | full harmonic series, long decay   |
pub fn builtin() -> Vec<ToneDescriptor> {
    vec![
        ToneDescriptor::new(
            "Xylophone",
            13,
            vec![
                Partial::new(1, 1.0),
                Partial::new(3, 0.45),
                Partial::new(6, 0.15),
                Partial::new(10, 0.05),
            ],
            EnvelopeShape::new(0.001, 0.25, 0.0, 0.1),
        ),
        ToneDescriptor::new(
            "Marimba",
            12,
            vec![
                Partial::new(1, 1.0),
                Partial::new(4, 0.35),
                Partial::new(10, 0.08),
            ],
            EnvelopeShape::new(0.002, 0.45, 0.0, 0.15),
        ),
        ToneDescriptor::new(
            "Guitar",
            24,
            vec![
                Partial::new(1, 1.0),
                Partial::new(2, 0.7),
                Partial::new(3, 0.45),
                Partial::new(4, 0.3),
                Partial::new(5, 0.2),
                Partial::new(6, 0.12),
            ],
            EnvelopeShape::new(0.003, 0.8, 0.1, 0.25),
        ),
        ToneDescriptor::new(
            "Piano",
            0,
            vec![
                Partial::new(1, 1.0),
                Partial::new(2, 0.55),
                Partial::new(3, 0.35),
                Partial::new(4, 0.22),
                Partial::new(5, 0.15),
                Partial::new(6, 0.1),
                Partial::new(7, 0.06),
                Partial::new(8, 0.04),
            ],
            EnvelopeShape::new(0.005, 1.2, 0.2, 0.4),
        ),
    ]
}
