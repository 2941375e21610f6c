/// Convert a MIDI-style pitch number to Hz (69 = A4 = 440 Hz).
///
/// Accepts any integer; pitches outside 0..=127 simply extrapolate.
#[inline]
pub fn pitch_to_hz(pitch: i32) -> f32 {
    440.0 * 2.0_f32.powf((pitch as f32 - 69.0) / 12.0)
}

/// Context passed to graph nodes during rendering
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - frequency: Pitch to render (Hz); zero for effect chains
/// - gain: Linear level the voice was scheduled at
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frequency: f32,
    pub gain: f32,
}

impl RenderCtx {
    /// Context for a voice playing `pitch`.
    pub fn from_pitch(sample_rate: f32, pitch: i32, gain: f32) -> Self {
        Self {
            sample_rate,
            frequency: pitch_to_hz(pitch),
            gain,
        }
    }

    pub fn from_freq(sample_rate: f32, frequency: f32, gain: f32) -> Self {
        Self {
            sample_rate,
            frequency,
            gain,
        }
    }

    /// Context for pitch-independent processing (the output chain).
    pub fn effect(sample_rate: f32) -> Self {
        Self::from_freq(sample_rate, 0.0, 1.0)
    }
}

/// Core trait for audio processing graph nodes
///
/// Sources write into `out`; effects transform `out` in place.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Gate opened. Effects ignore it.
    fn note_on(&mut self, _ctx: &RenderCtx) {}

    /// Gate closed. Effects ignore it.
    fn note_off(&mut self, _ctx: &RenderCtx) {}

    fn envelope_level(&self) -> Option<f32> {
        None
    }

    /// Whether this node is still producing sound.
    ///
    /// Voice management frees a voice once its graph reports `false`.
    fn is_active(&self) -> bool {
        true
    }
}

impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        (**self).note_on(ctx)
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        (**self).note_off(ctx)
    }

    fn envelope_level(&self) -> Option<f32> {
        (**self).envelope_level()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_pitches() {
        assert!((pitch_to_hz(69) - 440.0).abs() < 1e-3);
        assert!((pitch_to_hz(72) - 523.251).abs() < 1e-2);
        assert!((pitch_to_hz(48) - 130.813).abs() < 1e-2);
    }

    #[test]
    fn octave_doubles_frequency() {
        let base = pitch_to_hz(60);
        assert!((pitch_to_hz(72) / base - 2.0).abs() < 1e-4);
    }
}
