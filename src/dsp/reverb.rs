//! Schroeder room reverb.
//!
//! ```text
//! Input ──┬──→ [Comb 1] ──┐
//!         ├──→ [Comb 2] ──┤
//!         ├──→ [Comb 3] ──┼──→ (+) ──→ [Allpass 1] ──→ [Allpass 2] ──→ Output
//!         └──→ [Comb 4] ──┘
//! ```
//!
//! Each comb is a feedback delay with a one-pole lowpass in the loop
//! (`damping` eats the highs a little more on every pass). The comb lengths
//! are mutually prime so their echoes never pile up on one frequency. The
//! allpasses smear the summed echoes into a dense tail without colouring it.
//!
//! Delay lines are sized once for [`MAX_SAMPLE_RATE`]; retuning to a new
//! sample rate only moves the wrap point.

/// Highest sample rate the delay lines are sized for.
pub const MAX_SAMPLE_RATE: f32 = 192_000.0;

const COMB_TUNING_MS: [f32; 4] = [29.7, 37.1, 41.1, 43.7];
const ALLPASS_TUNING_MS: [f32; 2] = [5.0, 1.7];

#[inline]
fn ms_to_samples(ms: f32, sample_rate: f32) -> usize {
    (ms * sample_rate / 1000.0) as usize
}

/// Circular buffer with a movable wrap point.
struct DelayLine {
    buffer: Box<[f32]>,
    len: usize,
    pos: usize,
}

impl DelayLine {
    fn with_capacity(capacity: usize, len: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: vec![0.0; capacity].into_boxed_slice(),
            len: len.clamp(1, capacity),
            pos: 0,
        }
    }

    fn set_len(&mut self, len: usize) {
        self.len = len.clamp(1, self.buffer.len());
        self.pos %= self.len;
    }

    /// Oldest sample, i.e. the one written `len` steps ago.
    #[inline]
    fn read(&self) -> f32 {
        self.buffer[self.pos]
    }

    #[inline]
    fn write_and_advance(&mut self, value: f32) {
        self.buffer[self.pos] = value;
        self.pos = (self.pos + 1) % self.len;
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.pos = 0;
    }
}

pub struct CombFilter {
    line: DelayLine,
    feedback: f32,
    damp: f32,
    lowpass_state: f32,
}

impl CombFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self::with_capacity(delay_samples, delay_samples)
    }

    fn with_capacity(capacity: usize, delay_samples: usize) -> Self {
        Self {
            line: DelayLine::with_capacity(capacity, delay_samples),
            feedback: 0.84,
            damp: 0.2,
            lowpass_state: 0.0,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.98);
    }

    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    pub fn set_delay(&mut self, delay_samples: usize) {
        self.line.set_len(delay_samples);
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.line.read();
        self.lowpass_state = output * (1.0 - self.damp) + self.lowpass_state * self.damp;
        self.line
            .write_and_advance(input + self.lowpass_state * self.feedback);
        output
    }

    pub fn reset(&mut self) {
        self.line.clear();
        self.lowpass_state = 0.0;
    }
}

pub struct AllpassFilter {
    line: DelayLine,
    gain: f32,
}

impl AllpassFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self::with_capacity(delay_samples, delay_samples)
    }

    fn with_capacity(capacity: usize, delay_samples: usize) -> Self {
        Self {
            line: DelayLine::with_capacity(capacity, delay_samples),
            gain: 0.5,
        }
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 0.9);
    }

    pub fn set_delay(&mut self, delay_samples: usize) {
        self.line.set_len(delay_samples);
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.line.read();
        let output = -self.gain * input + delayed;
        self.line.write_and_advance(input + self.gain * output);
        output
    }

    pub fn reset(&mut self) {
        self.line.clear();
    }
}

pub struct SchroederReverb {
    combs: [CombFilter; 4],
    allpasses: [AllpassFilter; 2],
    sample_rate: f32,
}

impl SchroederReverb {
    pub fn new(sample_rate: f32) -> Self {
        let sample_rate = sample_rate.clamp(1.0, MAX_SAMPLE_RATE);
        let comb = |ms: f32| {
            CombFilter::with_capacity(
                ms_to_samples(ms, MAX_SAMPLE_RATE),
                ms_to_samples(ms, sample_rate),
            )
        };
        let allpass = |ms: f32| {
            AllpassFilter::with_capacity(
                ms_to_samples(ms, MAX_SAMPLE_RATE),
                ms_to_samples(ms, sample_rate),
            )
        };

        Self {
            combs: COMB_TUNING_MS.map(comb),
            allpasses: ALLPASS_TUNING_MS.map(allpass),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Retune every delay line for `sample_rate`. Does not allocate.
    pub fn configure(&mut self, sample_rate: f32) {
        let sample_rate = sample_rate.clamp(1.0, MAX_SAMPLE_RATE);
        for (comb, &ms) in self.combs.iter_mut().zip(COMB_TUNING_MS.iter()) {
            comb.set_delay(ms_to_samples(ms, sample_rate));
        }
        for (allpass, &ms) in self.allpasses.iter_mut().zip(ALLPASS_TUNING_MS.iter()) {
            allpass.set_delay(ms_to_samples(ms, sample_rate));
        }
        self.sample_rate = sample_rate;
    }

    /// `0.0` is a small room, `1.0` a long hall.
    pub fn set_room_size(&mut self, size: f32) {
        let feedback = 0.7 + size.clamp(0.0, 1.0) * 0.28;
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
        }
    }

    pub fn set_damping(&mut self, damp: f32) {
        for comb in &mut self.combs {
            comb.set_damp(damp);
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut output = self.combs.iter_mut().map(|c| c.process(input)).sum::<f32>() * 0.25;
        for allpass in &mut self.allpasses {
            output = allpass.process(output);
        }
        output
    }

    pub fn reset(&mut self) {
        self.combs.iter_mut().for_each(CombFilter::reset);
        self.allpasses.iter_mut().for_each(AllpassFilter::reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comb_echoes_after_its_delay() {
        let mut comb = CombFilter::new(10);
        comb.set_feedback(0.5);
        comb.set_damp(0.0);

        assert_eq!(comb.process(1.0), 0.0);
        for _ in 0..9 {
            comb.process(0.0);
        }

        assert!(comb.process(0.0) > 0.99);
    }

    #[test]
    fn allpass_keeps_most_energy() {
        let mut allpass = AllpassFilter::new(5);
        allpass.set_gain(0.5);

        let (mut energy_in, mut energy_out) = (0.0, 0.0);
        for i in 0..100 {
            let input = if i < 10 { 1.0 } else { 0.0 };
            let output = allpass.process(input);
            energy_in += input * input;
            energy_out += output * output;
        }

        assert!(energy_out > energy_in * 0.8);
    }

    #[test]
    fn impulse_leaves_a_tail() {
        let mut reverb = SchroederReverb::new(48_000.0);
        reverb.set_room_size(0.5);

        reverb.process(1.0);
        let has_tail = (0..5_000).any(|_| reverb.process(0.0).abs() > 0.001);

        assert!(has_tail);
    }

    #[test]
    fn max_room_size_stays_stable() {
        let mut reverb = SchroederReverb::new(48_000.0);
        reverb.set_room_size(1.0);

        for _ in 0..20_000 {
            let out = reverb.process(0.1);
            assert!(out.is_finite());
            assert!(out.abs() < 10.0, "unstable output {out}");
        }
    }

    #[test]
    fn configure_retunes_without_reallocating() {
        let mut reverb = SchroederReverb::new(44_100.0);
        reverb.configure(96_000.0);

        assert_eq!(reverb.sample_rate(), 96_000.0);
        reverb.process(1.0);
        assert!((0..20_000).any(|_| reverb.process(0.0).abs() > 0.001));
    }
}
