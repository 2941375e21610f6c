use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series: the source renders (or, for an
effect used as the head of a chain, transforms in place), then the effect
transforms the same buffer.

  [Source] ──→ [Effect] ──→ output

Nesting gives arbitrarily long chains. The output graph is four stages deep:

  FilterNode::lowpass(8000.0)
      .through(FilterNode::highpass(50.0))
      .through(CompressorNode::new(settings))
      .through(ReverbNode::chamber(0.35))

  = Through<Through<Through<Lowpass, Highpass>, Compressor>, Reverb>
*/

pub struct Through<S, F> {
    source: S,
    effect: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, effect: F) -> Self {
        Self { source, effect }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn effect(&self) -> &F {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut F {
        &mut self.effect
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.effect.render_block(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source.note_on(ctx);
        self.effect.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.source.note_off(ctx);
        self.effect.note_off(ctx);
    }

    fn envelope_level(&self) -> Option<f32> {
        self.source.envelope_level()
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{envelope::EnvNode, extensions::NodeExt, filter::FilterNode};

    fn ctx() -> RenderCtx {
        RenderCtx::effect(48_000.0)
    }

    #[test]
    fn effects_chain_in_order() {
        // highpass after lowpass: DC survives the first stage, not the second
        let mut chain = FilterNode::lowpass(1_000.0).through(FilterNode::highpass(200.0));
        let mut buffer = vec![1.0; 2048];

        chain.render_block(&mut buffer, &ctx());

        assert!(buffer[2047].abs() < 0.01);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn forwards_note_events_and_activity() {
        let mut node = EnvNode::adsr(0.001, 0.01, 0.5, 0.001).through(FilterNode::lowpass(500.0));
        let ctx = ctx();

        node.note_on(&ctx);
        assert!(node.is_active());

        node.note_off(&ctx);
        let mut buffer = vec![0.0; 256];
        node.render_block(&mut buffer, &ctx);

        assert!(!node.is_active(), "release should have finished");
    }

    #[test]
    fn exposes_stages() {
        let chain = FilterNode::lowpass(1_000.0).through(FilterNode::highpass(200.0));

        assert_eq!(chain.source().cutoff(), 1_000.0);
        assert_eq!(chain.effect().cutoff(), 200.0);
    }
}
