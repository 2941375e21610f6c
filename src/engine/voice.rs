use crate::{
    graph::{
        amplify::Amplify,
        envelope::EnvNode,
        extensions::NodeExt,
        node::{GraphNode, RenderCtx},
        wavetable::WavetableNode,
    },
    instrument::SoundBank,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Waiting,   // Scheduled, start offset not reached yet
    Gated,     // Sounding, gate held for the scheduled duration
    Releasing, // Gate closed, envelope fading out
}

/// One playing note: a wavetable shaped by its bank's envelope.
///
/// The node graph is built once; starting a note only swaps the table and
/// envelope shape, so voices can be reused from the audio thread.
pub struct Voice {
    graph: Amplify<WavetableNode, EnvNode>,
    state: VoiceState,
    pitch: i32,
    gain: f32,
    delay_frames: u64,
    gate_frames: u64,
    age: u64,
}

impl Voice {
    pub fn new() -> Self {
        Self {
            graph: WavetableNode::default().amplify(EnvNode::new(Default::default())),
            state: VoiceState::Free,
            pitch: 0,
            gain: 0.0,
            delay_frames: 0,
            gate_frames: 0,
            age: 0,
        }
    }

    /// Load `bank` and schedule it. Timing is in frames.
    pub fn start(
        &mut self,
        bank: &SoundBank,
        pitch: i32,
        gain: f32,
        delay_frames: u64,
        gate_frames: u64,
        age: u64,
    ) {
        self.graph.signal.set_table(bank.table().clone());
        self.graph.modulator.reset();
        self.graph.modulator.set_shape(bank.envelope());

        self.pitch = pitch;
        self.gain = gain;
        self.delay_frames = delay_frames;
        self.gate_frames = gate_frames;
        self.age = age;
        self.state = VoiceState::Waiting;
    }

    /// Close the gate now, or drop the note if it has not started yet.
    pub fn release(&mut self, sample_rate: f32) {
        match self.state {
            VoiceState::Waiting => self.free(),
            VoiceState::Gated => {
                let ctx = self.ctx(sample_rate);
                self.graph.note_off(&ctx);
                self.state = VoiceState::Releasing;
            }
            VoiceState::Free | VoiceState::Releasing => {}
        }
    }

    /// Add this voice's output for the next `mix.len()` frames into `mix`.
    ///
    /// `scratch` must be at least as long as `mix`. Gate and start
    /// boundaries are honoured to the sample.
    pub fn render_into(&mut self, mix: &mut [f32], scratch: &mut [f32], sample_rate: f32) {
        let frames = mix.len();
        let ctx = self.ctx(sample_rate);
        let mut offset = 0;

        if self.state == VoiceState::Waiting {
            let wait = self.delay_frames.min(frames as u64);
            self.delay_frames -= wait;
            offset = wait as usize;
            if self.delay_frames > 0 {
                return;
            }
            self.graph.note_on(&ctx);
            self.state = VoiceState::Gated;
        }

        while offset < frames && self.state != VoiceState::Free {
            if self.state == VoiceState::Gated && self.gate_frames == 0 {
                self.graph.note_off(&ctx);
                self.state = VoiceState::Releasing;
            }

            let remaining = frames - offset;
            let len = match self.state {
                VoiceState::Gated => self.gate_frames.min(remaining as u64) as usize,
                _ => remaining,
            };

            let segment = &mut scratch[..len];
            self.graph.render_block(segment, &ctx);
            for (out, sample) in mix[offset..offset + len].iter_mut().zip(segment.iter()) {
                *out += sample * self.gain;
            }

            if self.state == VoiceState::Gated {
                self.gate_frames -= len as u64;
            }
            offset += len;

            if self.state == VoiceState::Releasing && !self.graph.is_active() {
                self.free();
            }
        }
    }

    fn ctx(&self, sample_rate: f32) -> RenderCtx {
        RenderCtx::from_pitch(sample_rate, self.pitch, self.gain)
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.graph.signal.clear();
        self.graph.modulator.reset();
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn pitch(&self) -> i32 {
        self.pitch
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn envelope_level(&self) -> Option<f32> {
        self.graph.envelope_level()
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}
