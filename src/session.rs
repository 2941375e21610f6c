//! One-call setup of the engine/dispatcher pair.
//!
//! [`init`] validates the configuration and starts decoding instruments.
//! The returned [`PendingSession`] cannot play anything; only
//! [`PendingSession::wait`] hands out a [`NoteDispatcher`], and it does so
//! after every sound bank is ready.

use std::sync::Arc;

use log::info;

use crate::{
    config::PlaybackConfig,
    dispatch::{roles::RoleTable, NoteDispatcher},
    engine::{queue, PlaybackEngine},
    error::Result,
    instrument::{InstrumentLoader, PendingInstruments},
};

pub fn init(config: &PlaybackConfig) -> Result<PendingSession> {
    config.validate()?;
    let roles = config.role_table()?;
    let instruments = InstrumentLoader::new(config.descriptors()).spawn()?;

    Ok(PendingSession {
        config: config.clone(),
        roles,
        instruments,
    })
}

/// A session whose instruments are still decoding.
pub struct PendingSession {
    config: PlaybackConfig,
    roles: RoleTable,
    instruments: PendingInstruments,
}

impl PendingSession {
    pub fn is_ready(&self) -> bool {
        self.instruments.is_ready()
    }

    /// Block until every instrument is decoded, then build the engine.
    pub fn wait(self) -> Result<Session> {
        let registry = Arc::new(self.instruments.wait()?);

        let (tx, rx) = queue(self.config.queue_capacity);
        let engine = PlaybackEngine::new(&self.config, rx)?;
        let dispatcher = NoteDispatcher::new(registry, self.roles, tx);

        info!(
            "Session ready: {} Hz, {} voices, chain {}",
            self.config.sample_rate,
            self.config.max_voices,
            engine.output().stages().join(" → ")
        );

        Ok(Session { engine, dispatcher })
    }
}

/// The ready pair: move `engine` to the audio thread, keep `dispatcher`.
pub struct Session {
    pub engine: PlaybackEngine,
    pub dispatcher: NoteDispatcher,
}

impl Session {
    pub fn into_parts(self) -> (PlaybackEngine, NoteDispatcher) {
        (self.engine, self.dispatcher)
    }
}
