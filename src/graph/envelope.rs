use crate::{
    dsp::envelope::{Envelope, EnvelopeShape},
    graph::node::{GraphNode, RenderCtx},
};

/// Renders envelope levels; pair it with a source through `.amplify()`.
pub struct EnvNode {
    env: Envelope,
}

impl EnvNode {
    pub fn new(shape: EnvelopeShape) -> Self {
        Self {
            env: Envelope::new(shape),
        }
    }

    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self::new(EnvelopeShape::new(attack, decay, sustain, release))
    }

    pub fn shape(&self) -> EnvelopeShape {
        self.env.shape()
    }

    pub fn set_shape(&mut self, shape: EnvelopeShape) {
        self.env.set_shape(shape);
    }

    pub fn reset(&mut self) {
        self.env.reset();
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.env.render(out, ctx.sample_rate);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.env.gate_on();
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.env.gate_off(ctx.sample_rate);
    }

    fn envelope_level(&self) -> Option<f32> {
        Some(self.env.level())
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_levels_between_note_events() {
        let ctx = RenderCtx::effect(1_000.0);
        let mut node = EnvNode::adsr(0.01, 0.01, 0.5, 0.01);

        node.note_on(&ctx);
        let mut buffer = vec![0.0; 40];
        node.render_block(&mut buffer, &ctx);

        assert!(buffer.iter().any(|&level| level > 0.99));
        assert!((buffer[39] - 0.5).abs() < 1e-3);
        assert_eq!(node.envelope_level(), Some(buffer[39]));

        node.note_off(&ctx);
        node.render_block(&mut buffer, &ctx);
        assert!(!node.is_active());
    }
}
