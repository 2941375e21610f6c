use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// `signal × modulator`, sample by sample.
///
/// Activity follows the modulator only: an oscillator never goes quiet on
/// its own, so the envelope decides when the pair is done.
pub struct Amplify<N, M> {
    pub signal: N,
    pub modulator: M,
    scratch: Box<[f32]>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            scratch: vec![0.0; MAX_BLOCK_SIZE].into_boxed_slice(),
        }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.signal.render_block(chunk, ctx);

            let gains = &mut self.scratch[..chunk.len()];
            gains.fill(0.0);
            self.modulator.render_block(gains, ctx);

            for (sample, gain) in chunk.iter_mut().zip(gains.iter()) {
                *sample *= *gain;
            }
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.signal.note_on(ctx);
        self.modulator.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.signal.note_off(ctx);
        self.modulator.note_off(ctx);
    }

    fn envelope_level(&self) -> Option<f32> {
        self.modulator.envelope_level()
    }

    fn is_active(&self) -> bool {
        self.modulator.is_active()
    }
}
