//! Background decoding of sound banks.
//!
//! Every descriptor is decoded on its own worker thread. The set of workers
//! is the readiness barrier: a [`PendingInstruments`] only turns into an
//! [`InstrumentRegistry`] once all of them have finished, so nothing can
//! resolve an instrument that is still decoding.
//!
//! ```ignore
//! let pending = InstrumentLoader::builtin().spawn()?;
//! // ... other startup work ...
//! let registry = pending.wait()?;
//! ```

use std::{
    collections::BTreeSet,
    thread::{self, JoinHandle},
};

use log::{debug, info};

use crate::{
    error::{Error, Result},
    instrument::{builtin, InstrumentRegistry, SoundBank, ToneDescriptor},
};

pub struct InstrumentLoader {
    descriptors: Vec<ToneDescriptor>,
}

impl InstrumentLoader {
    pub fn new(descriptors: Vec<ToneDescriptor>) -> Self {
        Self { descriptors }
    }

    pub fn builtin() -> Self {
        Self::new(builtin())
    }

    /// Start one decode worker per descriptor.
    ///
    /// Duplicate names are rejected before any thread is started.
    pub fn spawn(self) -> Result<PendingInstruments> {
        let mut seen = BTreeSet::new();
        for descriptor in &self.descriptors {
            if !seen.insert(descriptor.name.as_str()) {
                return Err(Error::DuplicateInstrument(descriptor.name.clone()));
            }
        }

        info!("Decoding {} instruments ...", self.descriptors.len());

        let tasks = self
            .descriptors
            .into_iter()
            .map(DecodeTask::spawn)
            .collect::<Result<Vec<_>>>()?;

        Ok(PendingInstruments { tasks })
    }
}

struct DecodeTask {
    name: String,
    handle: JoinHandle<Result<SoundBank>>,
}

impl DecodeTask {
    fn spawn(descriptor: ToneDescriptor) -> Result<Self> {
        let name = descriptor.name.clone();
        let handle = thread::Builder::new()
            .name(format!("decode-{name}"))
            .spawn(move || {
                let bank = SoundBank::decode(&descriptor)?;
                debug!("Decoded {:?} (program {})", bank.name(), bank.program());
                Ok(bank)
            })?;

        Ok(Self { name, handle })
    }

    fn join(self) -> Result<SoundBank> {
        self.handle
            .join()
            .map_err(|_| Error::DecodeWorker(self.name))?
    }
}

/// Outcome of a non-blocking readiness check.
pub enum Readiness {
    Ready(InstrumentRegistry),
    Pending(PendingInstruments),
}

/// Instruments whose decode workers may still be running.
pub struct PendingInstruments {
    tasks: Vec<DecodeTask>,
}

impl PendingInstruments {
    /// Whether every decode worker has finished.
    pub fn is_ready(&self) -> bool {
        self.tasks.iter().all(|task| task.handle.is_finished())
    }

    /// Names still being decoded.
    pub fn pending_names(&self) -> impl Iterator<Item = &str> {
        self.tasks
            .iter()
            .filter(|task| !task.handle.is_finished())
            .map(|task| task.name.as_str())
    }

    /// Return the registry if every decode has finished, without blocking.
    pub fn try_ready(self) -> Result<Readiness> {
        if self.is_ready() {
            self.wait().map(Readiness::Ready)
        } else {
            Ok(Readiness::Pending(self))
        }
    }

    /// Block until every decode has finished.
    ///
    /// The first failing instrument is reported; the remaining workers are
    /// still joined so no thread outlives the call.
    pub fn wait(self) -> Result<InstrumentRegistry> {
        let mut banks = Vec::with_capacity(self.tasks.len());
        let mut first_error = None;

        for task in self.tasks {
            match task.join() {
                Ok(bank) => banks.push(bank),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        let registry = InstrumentRegistry::from_banks(banks);
        info!(
            "Instruments ready: {}",
            registry.names().collect::<Vec<_>>().join(", ")
        );
        Ok(registry)
    }
}
