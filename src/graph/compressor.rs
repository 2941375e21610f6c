use crate::{
    dsp::dynamics::{Compressor, CompressorSettings},
    graph::node::{GraphNode, RenderCtx},
};

/// Dynamics compressor stage.
///
/// Smoothing coefficients depend on the sample rate, which is only known
/// once rendering starts; the node retunes itself whenever it changes.
pub struct CompressorNode {
    compressor: Compressor,
    tuned_for: Option<f32>,
}

impl CompressorNode {
    pub fn new(settings: CompressorSettings) -> Self {
        Self {
            compressor: Compressor::new(settings, 48_000.0),
            tuned_for: None,
        }
    }

    pub fn settings(&self) -> &CompressorSettings {
        self.compressor.settings()
    }

    pub fn reduction_db(&self) -> f32 {
        self.compressor.reduction_db()
    }
}

impl GraphNode for CompressorNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if self.tuned_for != Some(ctx.sample_rate) {
            self.compressor.set_sample_rate(ctx.sample_rate);
            self.tuned_for = Some(ctx.sample_rate);
        }
        self.compressor.render(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scale_input_is_reduced() {
        let mut node = CompressorNode::new(CompressorSettings::default());
        let ctx = RenderCtx::effect(48_000.0);

        let mut buffer = vec![1.0; 48_000];
        node.render_block(&mut buffer, &ctx);

        // 0 dBFS is 30 dB over a -30 dB threshold at 12:1.
        assert!(node.reduction_db() < -20.0, "got {}", node.reduction_db());
        assert!(buffer[47_999] < 0.1);
    }
}
