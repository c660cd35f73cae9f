//! Output device negotiation and the cpal playback stream.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, StreamConfig, SupportedBufferSize, SupportedStreamConfig};
use log::{error, info, warn};

use super::format::{PcmFormat, SampleFormat};
use super::tracker::AudioMixer;
use crate::error::SongError;
use crate::params::PlaybackConfig;

/// Output device with a negotiated format, not yet playing
pub struct OutputDevice {
    device: cpal::Device,
    config: StreamConfig,
    format: PcmFormat,
}

impl OutputDevice {
    /// Open the default output device and negotiate a format close to `requested`
    pub fn open(requested: PcmFormat, playback: &PlaybackConfig) -> Result<Self, SongError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| SongError::AudioSetup("no audio output device found".to_string()))?;

        let (supported, sample_format) = match matching_config(&device, requested) {
            Some(found) => found,
            None => {
                warn!(
                    "Device has no {} configuration, falling back to its default",
                    requested
                );
                default_config(&device)?
            }
        };

        let buffer_size = match supported.buffer_size() {
            SupportedBufferSize::Range { min, max } => {
                BufferSize::Fixed(playback.buffer_frames.clamp(*min, *max))
            }
            SupportedBufferSize::Unknown => BufferSize::Default,
        };

        let config = StreamConfig {
            channels: supported.channels(),
            sample_rate: supported.sample_rate(),
            buffer_size,
        };

        let format = PcmFormat {
            sample_format,
            channels: config.channels,
            sample_rate: config.sample_rate.0,
        };

        info!(
            "Audio: {} @ {} (buffer {:?})",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            format,
            config.buffer_size
        );

        Ok(Self {
            device,
            config,
            format,
        })
    }

    /// Format the device actually plays
    pub fn format(&self) -> PcmFormat {
        self.format
    }

    /// Move `mixer` into the device callback and start playback
    pub fn start(self, mut mixer: AudioMixer) -> Result<AudioOutput, SongError> {
        if mixer.format() != self.format {
            return Err(SongError::AudioSetup(format!(
                "mixer produces {} but device plays {}",
                mixer.format(),
                self.format
            )));
        }

        let stream = self
            .device
            .build_output_stream_raw(
                &self.config,
                self.format.sample_format.to_cpal(),
                move |data: &mut cpal::Data, _: &cpal::OutputCallbackInfo| {
                    mixer.mix_audio(data.bytes_mut());
                },
                |err| error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| SongError::AudioSetup(format!("failed to build audio stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| SongError::AudioSetup(format!("failed to start audio stream: {}", e)))?;

        Ok(AudioOutput {
            _stream: stream,
            format: self.format,
        })
    }
}

/// Playing output stream, stops when dropped
pub struct AudioOutput {
    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
    format: PcmFormat,
}

impl AudioOutput {
    pub fn format(&self) -> PcmFormat {
        self.format
    }
}

/// Supported config with the requested channels and rate, requested sample
/// format preferred
fn matching_config(
    device: &cpal::Device,
    requested: PcmFormat,
) -> Option<(SupportedStreamConfig, SampleFormat)> {
    let rate = SampleRate(requested.sample_rate);

    let mut candidates: Vec<_> = device
        .supported_output_configs()
        .ok()?
        .filter(|range| {
            range.channels() == requested.channels
                && range.min_sample_rate() <= rate
                && rate <= range.max_sample_rate()
        })
        .filter_map(|range| {
            SampleFormat::from_cpal(range.sample_format())
                .map(|format| (range.with_sample_rate(rate), format))
        })
        .collect();

    candidates.sort_by_key(|(_, format)| *format != requested.sample_format);
    candidates.into_iter().next()
}

fn default_config(
    device: &cpal::Device,
) -> Result<(SupportedStreamConfig, SampleFormat), SongError> {
    let supported = device
        .default_output_config()
        .map_err(|e| SongError::AudioSetup(format!("failed to get audio config: {}", e)))?;

    let sample_format = SampleFormat::from_cpal(supported.sample_format()).ok_or_else(|| {
        SongError::AudioSetup(format!(
            "unsupported sample format: {:?}",
            supported.sample_format()
        ))
    })?;

    Ok((supported, sample_format))
}
