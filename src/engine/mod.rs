//! The realtime half: voices, the message queue and the output graph.
//!
//! A [`PlaybackEngine`] is moved into the audio callback. It drains
//! [`PlaybackMessage`]s from the dispatcher, mixes every sounding voice into
//! a mono buffer and runs that buffer through the [`OutputGraph`]. Nothing in
//! `render_block` locks, logs or allocates.

pub mod voice;

use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    config::PlaybackConfig,
    error::Result,
    graph::node::{pitch_to_hz, RenderCtx},
    instrument::SoundBank,
    output::OutputGraph,
    MAX_BLOCK_SIZE,
};

use self::voice::{Voice, VoiceState};

#[derive(Debug, Clone)]
pub enum PlaybackMessage {
    NoteOn {
        bank: Arc<SoundBank>,
        /// Seconds from the block in which the message is received.
        start: f32,
        pitch: i32,
        /// Gate length in seconds.
        duration: f32,
        gain: f32,
    },
    AllNotesOff,
}

/// Create the dispatcher → engine queue.
pub fn queue(capacity: usize) -> (Producer<PlaybackMessage>, Consumer<PlaybackMessage>) {
    RingBuffer::new(capacity.max(1))
}

pub struct PlaybackEngine {
    voices: Vec<Voice>,
    rx: Consumer<PlaybackMessage>,
    output: OutputGraph,
    sample_rate: f32,
    mix_buffer: Vec<f32>,
    temp_buffer: Vec<f32>,
    frame_counter: u64,
}

impl PlaybackEngine {
    pub fn new(config: &PlaybackConfig, rx: Consumer<PlaybackMessage>) -> Result<Self> {
        let output = OutputGraph::from_config(&config.chain)?;

        Ok(Self {
            voices: (0..config.max_voices.max(1)).map(|_| Voice::new()).collect(),
            rx,
            output,
            sample_rate: config.sample_rate as f32,
            mix_buffer: vec![0.0; MAX_BLOCK_SIZE],
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            frame_counter: 0,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Follow the device rate when it differs from the configured one.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    pub fn output(&self) -> &OutputGraph {
        &self.output
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| !v.is_free()).count()
    }

    pub fn voices(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter().filter(|v| !v.is_free())
    }

    /// Render mono output into `out`.
    pub fn render_block(&mut self, out: &mut [f32]) {
        self.drain_messages();

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk);
        }
    }

    /// Render interleaved output, copying the mono mix to every channel.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        self.drain_messages();

        for frames in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
            let len = frames.len() / channels;
            let mut mono = std::mem::take(&mut self.mix_buffer);
            self.render_chunk(&mut mono[..len]);

            let (whole, partial) = frames.split_at_mut(len * channels);
            for (frame, sample) in whole.chunks_exact_mut(channels).zip(mono[..len].iter()) {
                frame.fill(*sample);
            }
            partial.fill(0.0);
            self.mix_buffer = mono;
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        let scratch = &mut self.temp_buffer[..out.len()];
        for voice in self.voices.iter_mut().filter(|v| !v.is_free()) {
            voice.render_into(out, scratch, self.sample_rate);
        }

        self.output
            .process(out, &RenderCtx::effect(self.sample_rate));
        self.frame_counter += out.len() as u64;
    }

    fn drain_messages(&mut self) {
        while let Ok(msg) = self.rx.pop() {
            match msg {
                PlaybackMessage::NoteOn {
                    bank,
                    start,
                    pitch,
                    duration,
                    gain,
                } => {
                    if pitch_to_hz(pitch) >= self.sample_rate * 0.5 {
                        continue;
                    }

                    let delay = seconds_to_frames(start, self.sample_rate);
                    let gate = seconds_to_frames(duration, self.sample_rate);
                    let age = self.frame_counter;
                    let voice = self.allocate_voice();
                    voice.start(&bank, pitch, gain, delay, gate, age);
                }
                PlaybackMessage::AllNotesOff => {
                    for voice in &mut self.voices {
                        voice.release(self.sample_rate);
                    }
                }
            }
        }
    }

    /// A free voice if there is one, otherwise the oldest, preferring
    /// voices that are already releasing.
    fn allocate_voice(&mut self) -> &mut Voice {
        let idx = self
            .voices
            .iter()
            .position(Voice::is_free)
            .or_else(|| {
                self.voices
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, v)| (v.state() != VoiceState::Releasing, v.age()))
                    .map(|(idx, _)| idx)
            })
            .unwrap_or(0);

        &mut self.voices[idx]
    }
}

fn seconds_to_frames(seconds: f32, sample_rate: f32) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * sample_rate).round() as u64
    } else {
        0
    }
}
