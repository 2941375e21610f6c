//! Audio device output through cpal.

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Device, SampleFormat, Stream, SupportedStreamConfig,
};
use log::{error, info, warn};

use crate::{
    engine::PlaybackEngine,
    error::{Error, Result},
};

/// The default output device and its preferred stream configuration.
pub struct AudioHost {
    device: Device,
    config: SupportedStreamConfig,
}

impl AudioHost {
    pub fn open() -> Result<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(Error::NoOutputDevice)?;
        let config = device.default_output_config()?;

        if config.sample_format() != SampleFormat::F32 {
            return Err(Error::UnsupportedSampleFormat(
                config.sample_format().to_string(),
            ));
        }

        let host = Self { device, config };
        info!(
            "Output device {:?}: {} Hz, {} channels",
            host.device_name(),
            host.sample_rate(),
            host.channels()
        );
        Ok(host)
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate().0
    }

    pub fn channels(&self) -> usize {
        self.config.channels() as usize
    }

    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "unknown device".to_owned())
    }

    /// Move `engine` into the device callback and start the stream.
    ///
    /// The stream stops when the returned handle is dropped.
    pub fn play(&self, mut engine: PlaybackEngine) -> Result<Stream> {
        let device_rate = self.sample_rate() as f32;
        if engine.sample_rate() != device_rate {
            warn!(
                "Engine configured for {} Hz, device runs at {} Hz; following the device",
                engine.sample_rate(),
                device_rate
            );
            engine.set_sample_rate(device_rate);
        }

        let channels = self.channels();
        let stream = self.device.build_output_stream(
            &self.config.config(),
            move |data: &mut [f32], _| engine.render_interleaved(data, channels),
            |err| error!("Audio stream error: {err}"),
            None,
        )?;
        stream.play()?;

        Ok(stream)
    }
}
