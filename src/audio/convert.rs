//! Offline PCM conversion: channel remix, resample, encode to device bytes.

use std::borrow::Cow;

use log::debug;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use super::decode::DecodedAudio;
use super::format::{PcmFormat, SampleFormat};
use crate::error::SongError;

/// Convert the whole song into interleaved native-endian bytes in `target` layout
pub fn convert(audio: &DecodedAudio, target: PcmFormat) -> Result<Vec<u8>, SongError> {
    if audio.channels == 0 || target.channels == 0 {
        return Err(SongError::AudioSetup(format!(
            "cannot convert {} channels to {} channels",
            audio.channels, target.channels
        )));
    }

    let remixed = remix(&audio.samples, audio.channels, target.channels);

    let samples = if audio.sample_rate == target.sample_rate {
        remixed
    } else {
        debug!(
            "Resampling {}Hz -> {}Hz",
            audio.sample_rate, target.sample_rate
        );
        Cow::Owned(resample(
            &remixed,
            target.channels,
            audio.sample_rate,
            target.sample_rate,
        )?)
    };

    Ok(encode(&samples, target.sample_format))
}

/// Rearrange interleaved channels.
///
/// Mono is duplicated to every output channel, anything down to mono is
/// averaged, other layouts keep the leading channels and zero-fill the rest.
fn remix(samples: &[i32], from: u16, to: u16) -> Cow<'_, [i32]> {
    if from == to {
        return Cow::Borrowed(samples);
    }

    let from = from as usize;
    let to = to as usize;
    let mut out = Vec::with_capacity(samples.len() / from * to);

    for frame in samples.chunks_exact(from) {
        if to == 1 {
            let sum: i64 = frame.iter().map(|s| *s as i64).sum();
            out.push((sum / from as i64) as i32);
        } else if from == 1 {
            out.extend(std::iter::repeat(frame[0]).take(to));
        } else {
            out.extend((0..to).map(|c| frame.get(c).copied().unwrap_or(0)));
        }
    }

    Cow::Owned(out)
}

/// Band-limited resample of interleaved full-scale samples
fn resample(
    samples: &[i32],
    channels: u16,
    from_rate: u32,
    to_rate: u32,
) -> Result<Vec<i32>, SongError> {
    let channels = channels as usize;
    let frames = samples.len() / channels;
    if frames == 0 {
        return Ok(Vec::new());
    }

    let scale = 1.0 / (i32::MAX as f32 + 1.0);
    let planar: Vec<Vec<f32>> = (0..channels)
        .map(|c| {
            samples
                .iter()
                .skip(c)
                .step_by(channels)
                .map(|s| *s as f32 * scale)
                .collect()
        })
        .collect();

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, frames, channels)
        .map_err(|e| SongError::AudioSetup(format!("failed to create resampler: {}", e)))?;

    let delay = resampler.output_delay();
    let expected = (frames as f64 * ratio).round() as usize;

    let mut output = resampler
        .process(&planar, None)
        .map_err(|e| SongError::AudioSetup(format!("resampling failed: {}", e)))?;

    // Flush the filter tail until the delayed end of the song is out
    while output.first().map_or(0, Vec::len) < delay + expected {
        let tail = resampler
            .process_partial(None::<&[Vec<f32>]>, None)
            .map_err(|e| SongError::AudioSetup(format!("resampler flush failed: {}", e)))?;
        if tail.first().map_or(true, Vec::is_empty) {
            break;
        }
        for (channel, more) in output.iter_mut().zip(tail) {
            channel.extend(more);
        }
    }

    let available = output.first().map_or(0, Vec::len);
    let end = (delay + expected).min(available);
    let start = delay.min(end);

    let mut interleaved = Vec::with_capacity((end - start) * channels);
    for i in start..end {
        for channel in &output {
            interleaved.push(f32_to_i32(channel[i]));
        }
    }

    Ok(interleaved)
}

fn f32_to_i32(sample: f32) -> i32 {
    (sample.clamp(-1.0, 1.0) as f64 * i32::MAX as f64) as i32
}

/// Encode full-scale samples as native-endian bytes
fn encode(samples: &[i32], format: SampleFormat) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * format.bytes_per_sample());
    match format {
        SampleFormat::I16 => {
            for s in samples {
                out.extend_from_slice(&((*s >> 16) as i16).to_ne_bytes());
            }
        }
        SampleFormat::I32 => {
            for s in samples {
                out.extend_from_slice(&s.to_ne_bytes());
            }
        }
        SampleFormat::F32 => {
            let scale = 1.0 / (i32::MAX as f64 + 1.0);
            for s in samples {
                out.extend_from_slice(&((*s as f64 * scale) as f32).to_ne_bytes());
            }
        }
    }
    out
}
