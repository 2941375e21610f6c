//! Turning note requests into scheduled voices.
//!
//! The dispatcher lives on the control thread. It resolves the instrument,
//! applies the track's role profile and hands the result to the engine
//! through the lock-free queue. Requests that cannot be honoured are logged
//! and dropped; the caller is never interrupted.

pub mod roles;

use std::sync::Arc;

use log::{debug, warn};
use rtrb::Producer;

use crate::{
    engine::PlaybackMessage,
    instrument::{InstrumentRegistry, SoundBank},
};

pub use roles::{RoleProfile, RoleTable};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteRequest<'a> {
    pub track: u32,
    pub instrument: &'a str,
    /// Semitone offset from the role's base pitch.
    pub tone: i32,
    /// Requested length in seconds, before the role's duration scale.
    pub duration: f32,
}

impl<'a> NoteRequest<'a> {
    pub fn new(track: u32, instrument: &'a str, tone: i32, duration: f32) -> Self {
        Self {
            track,
            instrument,
            tone,
            duration,
        }
    }
}

/// A routed note, exactly as handed to the engine.
#[derive(Debug, Clone)]
pub struct ScheduledNote {
    pub role: String,
    pub bank: Arc<SoundBank>,
    /// Offset from now, in seconds. Always 0 for `play_note`.
    pub start: f32,
    pub pitch: i32,
    pub duration: f32,
    pub gain: f32,
}

impl ScheduledNote {
    fn message(&self) -> PlaybackMessage {
        PlaybackMessage::NoteOn {
            bank: self.bank.clone(),
            start: self.start,
            pitch: self.pitch,
            duration: self.duration,
            gain: self.gain,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("unknown instrument {0:?}")]
    UnknownInstrument(String),
    #[error("note duration must be positive and finite, got {0}")]
    InvalidDuration(f32),
    #[error("playback queue is full")]
    QueueFull,
}

pub struct NoteDispatcher {
    registry: Arc<InstrumentRegistry>,
    roles: RoleTable,
    tx: Producer<PlaybackMessage>,
}

impl NoteDispatcher {
    pub fn new(
        registry: Arc<InstrumentRegistry>,
        roles: RoleTable,
        tx: Producer<PlaybackMessage>,
    ) -> Self {
        Self { registry, roles, tx }
    }

    /// The instruments callers may name in a request.
    pub fn instruments(&self) -> &InstrumentRegistry {
        &self.registry
    }

    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    /// Route a request without scheduling it.
    pub fn plan(&self, request: &NoteRequest<'_>) -> Result<ScheduledNote, DispatchError> {
        let bank = self
            .registry
            .resolve(request.instrument)
            .ok_or_else(|| DispatchError::UnknownInstrument(request.instrument.to_owned()))?;

        if !request.duration.is_finite() || request.duration <= 0.0 {
            return Err(DispatchError::InvalidDuration(request.duration));
        }

        let (role, profile) = self.roles.profile_for(request.track);

        Ok(ScheduledNote {
            role: role.to_owned(),
            bank,
            start: 0.0,
            pitch: profile.pitch(request.tone),
            duration: profile.duration(request.duration),
            gain: profile.gain,
        })
    }

    /// Route a request and queue it for the engine.
    ///
    /// Pitches are not range checked here: the engine skips notes at or
    /// above Nyquist for whatever rate it is running at.
    pub fn try_play(&mut self, request: &NoteRequest<'_>) -> Result<ScheduledNote, DispatchError> {
        let note = self.plan(request)?;

        self.tx
            .push(note.message())
            .map_err(|_| DispatchError::QueueFull)?;

        debug!(
            "Track {} ({}): {} pitch {} for {:.3}s at gain {}",
            request.track,
            note.role,
            note.bank.name(),
            note.pitch,
            note.duration,
            note.gain
        );
        Ok(note)
    }

    /// Play `tone` on `instrument` using the profile of `track`'s role.
    ///
    /// Always returns `false`. The value carries no information and exists
    /// only for callers that expect a boolean; use [`try_play`] to learn
    /// whether the note was scheduled.
    ///
    /// [`try_play`]: Self::try_play
    pub fn play_note(&mut self, track: u32, instrument: &str, tone: i32, duration: f32) -> bool {
        let request = NoteRequest::new(track, instrument, tone, duration);
        if let Err(err) = self.try_play(&request) {
            warn!("Dropped note on track {track}: {err}");
        }
        false
    }

    /// Release every sounding voice and drop notes that have not started.
    pub fn all_notes_off(&mut self) -> Result<(), DispatchError> {
        self.tx
            .push(PlaybackMessage::AllNotesOff)
            .map_err(|_| DispatchError::QueueFull)
    }
}
