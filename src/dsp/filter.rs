use std::f32::consts::{FRAC_1_SQRT_2, PI};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type      | constructed by | passes       | rejects      |
| --------- | -------------- | ------------ | ------------ |
| low-pass  | LPF            | below cutoff | above cutoff |
| high-pass | HPF            | above cutoff | below cutoff |

Both responses come out of the same two-integrator loop, so switching type
never needs new state.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
}

pub struct SvfOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

/// Topology-preserving-transform state-variable filter.
///
/// `q` follows the usual convention: `1/√2` is maximally flat (Butterworth),
/// larger values ring at the cutoff.
pub struct SVFilter {
    ic1eq: f32,
    ic2eq: f32,

    cutoff_hz: f32,
    q: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q: FRAC_1_SQRT_2,
            filter_type,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz)
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q.max(0.05);
    }

    /// Prewarped integrator gain and damping for the current settings.
    ///
    /// The cutoff is held just under Nyquist, where `tan` diverges.
    #[inline]
    fn coefficients(&self, sample_rate: f32) -> (f32, f32) {
        let cutoff = self.cutoff_hz.clamp(1.0, sample_rate * 0.49);
        let g = (PI * cutoff / sample_rate).tan();
        let k = 1.0 / self.q;
        (g, k)
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, g: f32, k: f32) -> SvfOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        SvfOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    /// Filter `buffer` in place.
    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let (g, k) = self.coefficients(sample_rate);

        for sample in buffer.iter_mut() {
            let outputs = self.next_sample(*sample, g, k);
            *sample = match self.filter_type {
                FilterType::LowPass => outputs.lowpass,
                FilterType::HighPass => outputs.highpass,
            };
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (TAU * freq * n as f32 / SAMPLE_RATE).sin())
            .collect()
    }

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len() / 2;
        buffer[skip..]
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut filter = SVFilter::lowpass(500.0);
        let mut buffer = vec![1.0; 512];

        filter.render(&mut buffer, SAMPLE_RATE);

        assert!((buffer[511] - 1.0).abs() < 0.01, "got {}", buffer[511]);
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut filter = SVFilter::highpass(500.0);
        let mut buffer = vec![1.0; 512];

        filter.render(&mut buffer, SAMPLE_RATE);

        assert!(buffer[511].abs() < 0.001, "got {}", buffer[511]);
    }

    #[test]
    fn lowpass_attenuates_above_cutoff() {
        let mut filter = SVFilter::lowpass(500.0);
        let mut buffer = sine(5_000.0, 1024);

        filter.render(&mut buffer, SAMPLE_RATE);

        // A decade above cutoff a 12 dB/oct slope leaves roughly 1%.
        let peak = peak_after_transient(&buffer);
        assert!(peak < 0.05, "expected attenuation, got peak {peak}");
    }

    #[test]
    fn highpass_attenuates_below_cutoff() {
        let mut filter = SVFilter::highpass(500.0);
        let mut buffer = sine(50.0, 4096);

        filter.render(&mut buffer, SAMPLE_RATE);

        let peak = peak_after_transient(&buffer);
        assert!(peak < 0.05, "expected attenuation, got peak {peak}");
    }

    #[test]
    fn passband_is_left_mostly_untouched() {
        let mut filter = SVFilter::lowpass(8_000.0);
        let mut buffer = sine(440.0, 2048);

        filter.render(&mut buffer, SAMPLE_RATE);

        let peak = peak_after_transient(&buffer);
        assert!(peak > 0.95 && peak < 1.05, "got peak {peak}");
    }

    #[test]
    fn higher_q_boosts_cutoff() {
        let mut flat = SVFilter::lowpass(1_000.0);
        let mut resonant = SVFilter::lowpass(1_000.0);
        resonant.set_q(4.0);

        let mut a = sine(1_000.0, 2048);
        let mut b = a.clone();
        flat.render(&mut a, SAMPLE_RATE);
        resonant.render(&mut b, SAMPLE_RATE);

        assert!(peak_after_transient(&b) > peak_after_transient(&a) * 2.0);
    }

    #[test]
    fn cutoff_above_nyquist_stays_finite() {
        let mut filter = SVFilter::lowpass(40_000.0);
        let mut buffer = sine(1_000.0, 256);

        filter.render(&mut buffer, SAMPLE_RATE);

        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}
