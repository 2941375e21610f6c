use crate::dsp::reverb::SchroederReverb;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Reverb Node
===========

Last stage of the output chain: everything the voices play ends up in the
same virtual room, which is what glues separate tracks into one performance.

Room Size (0.0 - 1.0):  0.0 = small room, 1.0 = large hall
Damping   (0.0 - 1.0):  0.0 = bright stone, 1.0 = dark and muffled
Mix       (0.0 - 1.0):  0.0 = dry only, 1.0 = reverb only

Presets:

  ReverbNode::room(mix)     short and tight
  ReverbNode::hall(mix)     balanced
  ReverbNode::chamber(mix)  long, bright stone chamber (chain default)
*/

pub struct ReverbNode {
    reverb: SchroederReverb,
    room_size: f32,
    damping: f32,
    mix: f32,
}

impl ReverbNode {
    pub fn new(room_size: f32, damping: f32, mix: f32) -> Self {
        let room_size = room_size.clamp(0.0, 1.0);
        let damping = damping.clamp(0.0, 1.0);

        let mut reverb = SchroederReverb::new(48_000.0);
        reverb.set_room_size(room_size);
        reverb.set_damping(damping);

        Self {
            reverb,
            room_size,
            damping,
            mix: mix.clamp(0.0, 1.0),
        }
    }

    pub fn room(mix: f32) -> Self {
        Self::new(0.3, 0.5, mix)
    }

    pub fn hall(mix: f32) -> Self {
        Self::new(0.6, 0.4, mix)
    }

    pub fn chamber(mix: f32) -> Self {
        Self::new(0.8, 0.2, mix)
    }

    pub fn room_size(&self) -> f32 {
        self.room_size
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }
}

impl GraphNode for ReverbNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if self.reverb.sample_rate() != ctx.sample_rate {
            self.reverb.configure(ctx.sample_rate);
        }

        for sample in out.iter_mut() {
            let dry = *sample;
            let wet = self.reverb.process(dry);
            *sample = dry * (1.0 - self.mix) + wet * self.mix;
        }
    }
}
