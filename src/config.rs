//! Playback configuration.
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! stock setup: four built-in instruments, lead on track 0, accompaniment
//! everywhere else, and the lowpass → highpass → compressor → reverb chain.
//!
//! ```toml
//! sample_rate = 48000
//! max_voices = 32
//!
//! [roles.bass]
//! octave_base = 36
//! duration_scale = 1.0
//! gain = 0.4
//!
//! [[track_roles]]
//! track = 3
//! role = "bass"
//!
//! [chain.lowpass]
//! cutoff_hz = 8000.0
//!
//! [chain.compressor]
//! threshold_db = -30.0
//! ratio = 12.0
//! ```

use std::collections::BTreeMap;
#[cfg(feature = "serde")]
use std::{fs, path::Path, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dispatch::roles::{RoleProfile, RoleTable},
    dsp::dynamics::CompressorSettings,
    error::{Error, Result},
    instrument::{builtin, ToneDescriptor},
};

/// One filter stage. `CUTOFF_HZ` is the cutoff used when none is configured.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, bound(deserialize = "")))]
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig<const CUTOFF_HZ: u32> {
    pub cutoff_hz: f32,
    pub q: f32,
}

pub type LowpassConfig = FilterConfig<8_000>;
pub type HighpassConfig = FilterConfig<50>;

impl<const CUTOFF_HZ: u32> FilterConfig<CUTOFF_HZ> {
    pub fn new(cutoff_hz: f32) -> Self {
        Self {
            cutoff_hz,
            q: butterworth_q(),
        }
    }
}

impl<const CUTOFF_HZ: u32> Default for FilterConfig<CUTOFF_HZ> {
    fn default() -> Self {
        Self::new(CUTOFF_HZ as f32)
    }
}

fn butterworth_q() -> f32 {
    std::f32::consts::FRAC_1_SQRT_2
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ReverbConfig {
    pub room_size: f32,
    pub damping: f32,
    /// Wet share of the output, 0 = dry only.
    pub mix: f32,
}

impl Default for ReverbConfig {
    fn default() -> Self {
        Self {
            room_size: 0.8,
            damping: 0.2,
            mix: 0.35,
        }
    }
}

/// Settings for the four stages of the output chain.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ChainConfig {
    pub lowpass: LowpassConfig,
    pub highpass: HighpassConfig,
    pub compressor: CompressorSettings,
    pub reverb: ReverbConfig,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            lowpass: LowpassConfig::default(),
            highpass: HighpassConfig::default(),
            compressor: CompressorSettings::default(),
            reverb: ReverbConfig::default(),
        }
    }
}

impl ChainConfig {
    pub fn validate(&self) -> Result<()> {
        let filters = [
            ("lowpass", self.lowpass.cutoff_hz, self.lowpass.q),
            ("highpass", self.highpass.cutoff_hz, self.highpass.q),
        ];
        for (stage, cutoff_hz, q) in filters {
            if !cutoff_hz.is_finite() || cutoff_hz <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{stage} cutoff must be positive, got {cutoff_hz}"
                )));
            }
            if !q.is_finite() || q <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{stage} q must be positive, got {q}"
                )));
            }
        }

        let comp = &self.compressor;
        if !comp.ratio.is_finite() || comp.ratio < 1.0 {
            return Err(Error::InvalidConfig(format!(
                "compressor ratio must be at least 1, got {}",
                comp.ratio
            )));
        }
        let rest = [comp.threshold_db, comp.knee_db, comp.attack, comp.release];
        if rest.iter().any(|v| !v.is_finite()) || comp.knee_db < 0.0 {
            return Err(Error::InvalidConfig(
                "compressor settings must be finite with a non-negative knee".to_owned(),
            ));
        }
        if comp.attack < 0.0 || comp.release < 0.0 {
            return Err(Error::InvalidConfig(
                "compressor attack and release must not be negative".to_owned(),
            ));
        }

        let reverb = [self.reverb.room_size, self.reverb.damping, self.reverb.mix];
        if reverb.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(Error::InvalidConfig(
                "reverb room_size, damping and mix must be within 0..=1".to_owned(),
            ));
        }

        Ok(())
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRoleAssignment {
    pub track: u32,
    pub role: String,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    pub sample_rate: u32,
    pub max_voices: usize,
    /// Notes that can wait between two audio callbacks.
    pub queue_capacity: usize,
    /// Merged over the built-in `lead` and `accompaniment` profiles.
    pub roles: BTreeMap<String, RoleProfile>,
    pub track_roles: Vec<TrackRoleAssignment>,
    pub chain: ChainConfig,
    /// Replaces the built-in instruments when not empty.
    pub instruments: Vec<ToneDescriptor>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            max_voices: 32,
            queue_capacity: 256,
            roles: BTreeMap::new(),
            track_roles: Vec::new(),
            chain: ChainConfig::default(),
            instruments: Vec::new(),
        }
    }
}

impl PlaybackConfig {
    #[cfg(feature = "serde")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        fs::read_to_string(path)?.parse()
    }

    /// Role table with configured profiles and track bindings applied.
    pub fn role_table(&self) -> Result<RoleTable> {
        let mut table = self
            .roles
            .iter()
            .fold(RoleTable::new(), |table, (name, profile)| {
                table.with_profile(name.clone(), *profile)
            });

        for assignment in &self.track_roles {
            table.assign(assignment.track, &assignment.role)?;
        }
        Ok(table)
    }

    /// Instruments to load: the configured ones, or the built-ins.
    pub fn descriptors(&self) -> Vec<ToneDescriptor> {
        if self.instruments.is_empty() {
            builtin()
        } else {
            self.instruments.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidConfig(
                "sample_rate must be positive".to_owned(),
            ));
        }
        if self.max_voices == 0 {
            return Err(Error::InvalidConfig("max_voices must be positive".to_owned()));
        }
        if self.queue_capacity == 0 {
            return Err(Error::InvalidConfig(
                "queue_capacity must be positive".to_owned(),
            ));
        }

        for (name, profile) in &self.roles {
            if !profile.duration_scale.is_finite()
                || profile.duration_scale <= 0.0
                || !profile.gain.is_finite()
                || profile.gain < 0.0
            {
                return Err(Error::InvalidConfig(format!(
                    "role {name:?} needs a positive duration_scale and a non-negative gain"
                )));
            }
        }

        self.chain.validate()?;
        self.role_table().map(|_| ())
    }
}

#[cfg(feature = "serde")]
impl FromStr for PlaybackConfig {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self> {
        let config: PlaybackConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}
