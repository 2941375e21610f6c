//! Level and pitch measurements on rendered audio.
//!
//! Used by the integration tests to check that what comes out of the engine
//! matches what was scheduled.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

pub fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0, |acc, s| acc.max(s.abs()))
}

pub fn rms(buffer: &[f32]) -> f32 {
    if buffer.is_empty() {
        return 0.0;
    }
    (buffer.iter().map(|s| s * s).sum::<f32>() / buffer.len() as f32).sqrt()
}

/// Strongest frequency in `buffer`, in Hz.
///
/// Returns `None` for buffers shorter than 4 samples or without energy
/// above DC.
pub fn dominant_frequency(buffer: &[f32], sample_rate: f32) -> Option<f32> {
    SpectrumAnalyzer::new(buffer.len()).dominant_frequency(buffer, sample_rate)
}

/// Windowed FFT of a fixed length.
pub struct SpectrumAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl SpectrumAnalyzer {
    pub fn new(len: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(len);

        // Hann window - reduces spectral leakage
        let window = (0..len)
            .map(|i| {
                if len > 1 {
                    let denom = (len - 1) as f32;
                    0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos())
                } else {
                    1.0
                }
            })
            .collect();

        Self {
            window,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); len],
            magnitudes: vec![0.0; len / 2],
        }
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Magnitude of each bin up to (excluding) Nyquist.
    ///
    /// Only the first `len()` samples of `buffer` are analysed; shorter
    /// buffers are zero-padded.
    pub fn magnitudes(&mut self, buffer: &[f32]) -> &[f32] {
        for (i, bin) in self.scratch.iter_mut().enumerate() {
            let sample = buffer.get(i).copied().unwrap_or(0.0);
            *bin = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.scratch);

        for (magnitude, bin) in self.magnitudes.iter_mut().zip(self.scratch.iter()) {
            *magnitude = bin.norm();
        }
        &self.magnitudes
    }

    pub fn dominant_frequency(&mut self, buffer: &[f32], sample_rate: f32) -> Option<f32> {
        let len = self.len();
        if len < 4 {
            return None;
        }

        let magnitudes = self.magnitudes(buffer);
        let (index, &peak) = magnitudes
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|a, b| a.1.total_cmp(b.1))?;
        if peak <= f32::EPSILON {
            return None;
        }

        // Parabolic interpolation between neighbouring bins
        let offset = match (magnitudes.get(index - 1), magnitudes.get(index + 1)) {
            (Some(&left), Some(&right)) => {
                let denom = left - 2.0 * peak + right;
                if denom.abs() > f32::EPSILON {
                    0.5 * (left - right) / denom
                } else {
                    0.0
                }
            }
            _ => 0.0,
        };

        Some((index as f32 + offset) * sample_rate / len as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, len: usize, sample_rate: f32) -> Vec<f32> {
        (0..len)
            .map(|n| (std::f32::consts::TAU * freq * n as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn finds_a_pure_tone() {
        let buffer = sine(523.25, 8_192, 48_000.0);

        let freq = dominant_frequency(&buffer, 48_000.0).expect("tone present");
        assert!((freq - 523.25).abs() < 3.0, "got {freq}");
    }

    #[test]
    fn strongest_of_two_tones_wins() {
        let low = sine(130.81, 8_192, 48_000.0);
        let high = sine(1_000.0, 8_192, 48_000.0);
        let mixed: Vec<f32> = low
            .iter()
            .zip(high.iter())
            .map(|(l, h)| l + 0.3 * h)
            .collect();

        let freq = dominant_frequency(&mixed, 48_000.0).expect("tone present");
        assert!((freq - 130.81).abs() < 3.0, "got {freq}");
    }

    #[test]
    fn silence_has_no_pitch() {
        assert_eq!(dominant_frequency(&[0.0; 1_024], 48_000.0), None);
        assert_eq!(dominant_frequency(&[1.0, -1.0], 48_000.0), None);
    }

    #[test]
    fn levels() {
        let buffer = sine(1_000.0, 4_800, 48_000.0);

        assert!((peak(&buffer) - 1.0).abs() < 1e-3);
        assert!((rms(&buffer) - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-3);
        assert_eq!(rms(&[]), 0.0);
    }
}
