/// Errors raised while configuring, loading or opening playback.
///
/// Note dispatch has its own [`DispatchError`](crate::dispatch::DispatchError)
/// because a dropped note is reported, never propagated.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("track {track} is assigned to unknown role {role:?}")]
    UnknownRole { track: u32, role: String },
    #[error("instrument {0:?} is declared more than once")]
    DuplicateInstrument(String),
    #[error("instrument {name:?} could not be decoded: {reason}")]
    Decode { name: String, reason: String },
    #[error("decoder for instrument {0:?} panicked")]
    DecodeWorker(String),
    #[error("no default output device available")]
    NoOutputDevice,
    #[error("output device uses unsupported sample format {0}")]
    UnsupportedSampleFormat(String),
    #[error("failed to fetch default output config: {0}")]
    StreamConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
