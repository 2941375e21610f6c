//! Dynamics compression.
//!
//! A feed-forward compressor in the log domain:
//!
//! ```text
//! input ──┬──────────────────────────────→ (×) ──→ output
//!         │                                 ↑
//!         └→ |x| → dB → static curve → smoothing → gain
//! ```
//!
//! # Static curve
//!
//! With threshold `T`, ratio `R` and knee width `W` (all in dB), the gain
//! reduction for an input level `x` is:
//!
//! ```text
//! x < T - W/2            0
//! x > T + W/2            (T - x) · (1 - 1/R)
//! otherwise              -(1 - 1/R) · (x - T + W/2)² / (2W)
//! ```
//!
//! The quadratic section joins the two straight lines without a corner, so
//! a wide knee (40 dB is the chain default) compresses gently long before
//! the threshold is crossed.
//!
//! # Smoothing
//!
//! The gain reduction moves toward its target with one-pole smoothing: the
//! attack time applies while reduction increases, the release time while it
//! recovers.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Floor for level detection, keeps `log10` away from zero.
const SILENCE_DB: f32 = -120.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorSettings {
    /// Level in dBFS where compression reaches full ratio (knee centre).
    pub threshold_db: f32,
    /// Width of the soft knee in dB.
    pub knee_db: f32,
    /// Input dB change per 1 dB of output change above the knee.
    pub ratio: f32,
    /// Seconds to reach ~63% of an increase in gain reduction.
    pub attack: f32,
    /// Seconds to recover ~63% of the way back.
    pub release: f32,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            threshold_db: -30.0,
            knee_db: 40.0,
            ratio: 12.0,
            attack: 0.15,
            release: 0.25,
        }
    }
}

#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    if gain <= 0.0 {
        SILENCE_DB
    } else {
        (20.0 * gain.log10()).max(SILENCE_DB)
    }
}

#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Static gain reduction (≤ 0 dB) for a detected input level.
pub fn gain_reduction_db(input_db: f32, settings: &CompressorSettings) -> f32 {
    let slope = 1.0 - 1.0 / settings.ratio.max(1.0);
    let half_knee = settings.knee_db.max(0.0) / 2.0;
    let overshoot = input_db - settings.threshold_db;

    if overshoot <= -half_knee {
        0.0
    } else if overshoot >= half_knee || half_knee == 0.0 {
        -overshoot * slope
    } else {
        let x = overshoot + half_knee;
        -slope * x * x / (2.0 * settings.knee_db)
    }
}

/// One-pole smoothing coefficient for a time constant in seconds.
#[inline]
fn smoothing_coeff(time: f32, sample_rate: f32) -> f32 {
    if time <= 0.0 {
        0.0
    } else {
        (-1.0 / (time * sample_rate)).exp()
    }
}

pub struct Compressor {
    settings: CompressorSettings,
    attack_coeff: f32,
    release_coeff: f32,
    reduction_db: f32,
    sample_rate: f32,
}

impl Compressor {
    pub fn new(settings: CompressorSettings, sample_rate: f32) -> Self {
        Self {
            settings,
            attack_coeff: smoothing_coeff(settings.attack, sample_rate),
            release_coeff: smoothing_coeff(settings.release, sample_rate),
            reduction_db: 0.0,
            sample_rate,
        }
    }

    pub fn settings(&self) -> &CompressorSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: CompressorSettings) {
        self.settings = settings;
        self.set_sample_rate(self.sample_rate);
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.attack_coeff = smoothing_coeff(self.settings.attack, sample_rate);
        self.release_coeff = smoothing_coeff(self.settings.release, sample_rate);
    }

    /// Current smoothed gain reduction in dB (≤ 0).
    pub fn reduction_db(&self) -> f32 {
        self.reduction_db
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let target = gain_reduction_db(gain_to_db(input.abs()), &self.settings);

        let coeff = if target < self.reduction_db {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.reduction_db = target + coeff * (self.reduction_db - target);

        input * db_to_gain(self.reduction_db)
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.reduction_db = 0.0;
    }
}
