//! Single-cycle wavetables.
//!
//! A sound bank's timbre is described by harmonic partials. Decoding sums
//! those sines once into a table of [`TABLE_SIZE`] samples. Playback then
//! only walks a phase accumulator through the table, so any pitch costs the
//! same: one interpolated read per sample.
//!
//! The table stores one extra guard sample equal to the first, which lets
//! linear interpolation read `index + 1` without wrapping.

use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const TABLE_SIZE: usize = 2048;

/// One sine component of a timbre.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    /// Multiple of the fundamental (1 = fundamental).
    pub harmonic: u32,
    pub amplitude: f32,
}

impl Partial {
    pub const fn new(harmonic: u32, amplitude: f32) -> Self {
        Self {
            harmonic,
            amplitude,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Wavetable {
    samples: Box<[f32]>,
}

impl Wavetable {
    /// Sum `partials` into a table normalised to a peak of 1.0.
    ///
    /// Harmonics at or above the table's own Nyquist are skipped. Returns
    /// `None` when nothing audible is left.
    pub fn from_partials(partials: &[Partial]) -> Option<Self> {
        let mut samples = vec![0.0f32; TABLE_SIZE + 1];
        let nyquist = (TABLE_SIZE / 2) as u32;

        for partial in partials
            .iter()
            .filter(|p| p.harmonic > 0 && p.harmonic < nyquist && p.amplitude != 0.0)
        {
            let step = TAU * partial.harmonic as f32 / TABLE_SIZE as f32;
            for (i, sample) in samples.iter_mut().take(TABLE_SIZE).enumerate() {
                *sample += partial.amplitude * (step * i as f32).sin();
            }
        }

        let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        if peak <= f32::EPSILON || !peak.is_finite() {
            return None;
        }

        for sample in samples.iter_mut() {
            *sample /= peak;
        }
        samples[TABLE_SIZE] = samples[0];

        Some(Self {
            samples: samples.into_boxed_slice(),
        })
    }

    /// Interpolated read at `phase` in `0.0..1.0`.
    #[inline]
    pub fn read(&self, phase: f32) -> f32 {
        let position = phase * TABLE_SIZE as f32;
        let index = (position as usize).min(TABLE_SIZE - 1);
        let frac = position - index as f32;
        let a = self.samples[index];
        let b = self.samples[index + 1];
        a + (b - a) * frac
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples[..TABLE_SIZE]
    }
}

/// Phase accumulator reading through a [`Wavetable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TablePhase {
    phase: f32,
}

impl TablePhase {
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    pub fn next(&mut self, table: &Wavetable, frequency: f32, sample_rate: f32) -> f32 {
        let value = table.read(self.phase);
        self.phase += frequency / sample_rate;
        self.phase -= self.phase.floor();
        value
    }
}
