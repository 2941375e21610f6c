use crate::{
    dsp::filter::{FilterType, SVFilter},
    graph::node::{GraphNode, RenderCtx},
};

/*
Filter Node
===========

The output chain uses two of these back to back:

  lowpass  (8 kHz): shaves off the brittle top end of bright wavetables,
                    including what little aliasing high notes produce.
  highpass (50 Hz): removes sub-bass rumble and DC before the compressor,
                    so inaudible energy never triggers gain reduction.

Cutoff (Hz): where the response turns over, clamped to 20 Hz - 20 kHz.
Q:           0.707 is flat; higher values add a resonant bump at cutoff.
*/

pub struct FilterNode {
    filter: SVFilter,
}

impl FilterNode {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::new(filter_type, cutoff_hz.clamp(20.0, 20_000.0)),
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz)
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.filter.set_q(q);
        self
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter.filter_type()
    }

    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff()
    }

    pub fn q(&self) -> f32 {
        self.filter.q()
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.filter.set_cutoff(cutoff_hz.clamp(20.0, 20_000.0));
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx.sample_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_is_clamped_to_audible_range() {
        let mut node = FilterNode::lowpass(100_000.0);
        assert_eq!(node.cutoff(), 20_000.0);

        node.set_cutoff(1.0);
        assert_eq!(node.cutoff(), 20.0);
    }

    #[test]
    fn with_q_sets_resonance() {
        let node = FilterNode::highpass(50.0).with_q(2.0);

        assert_eq!(node.filter_type(), FilterType::HighPass);
        assert!((node.q() - 2.0).abs() < 1e-6);
    }
}
