//! Full-file decode of the song into interleaved 32-bit PCM.

use std::path::Path;

use log::{debug, info};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::format::{PcmFormat, SampleFormat};
use crate::error::SongError;

/// Decoded song, interleaved full-scale `i32` samples
#[derive(Debug, Clone, Default)]
pub struct DecodedAudio {
    pub samples: Vec<i32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Number of PCM frames (samples per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    /// Native layout of the decoded samples
    pub fn format(&self) -> PcmFormat {
        PcmFormat {
            sample_format: SampleFormat::I32,
            channels: self.channels,
            sample_rate: self.sample_rate,
        }
    }

    pub fn duration_s(&self) -> f64 {
        self.frames() as f64 / self.sample_rate.max(1) as f64
    }

    /// Mono mixdown as floats in [-1, 1]
    pub fn mono(&self) -> Vec<f32> {
        if self.channels == 0 {
            return Vec::new();
        }
        let scale = 1.0 / (i32::MAX as f64 + 1.0);
        self.samples
            .chunks_exact(self.channels as usize)
            .map(|frame| {
                let sum: f64 = frame.iter().map(|s| *s as f64).sum();
                (sum / frame.len() as f64 * scale) as f32
            })
            .collect()
    }
}

/// Decode an entire audio file (FLAC, or any other format symphonia recognises)
pub fn decode_audio(path: &Path) -> Result<DecodedAudio, SongError> {
    let file = std::fs::File::open(path).map_err(|e| SongError::decode(path, e))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| SongError::decode(path, format!("unrecognised format: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| SongError::decode(path, "no audio tracks found"))?;

    let track_id = track.id;
    let mut channels = track.codec_params.channels.map(|c| c.count() as u16);
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| SongError::decode(path, "unknown sample rate"))?;
    if let Some(frames) = track.codec_params.n_frames {
        debug!("Expecting {} frames", frames);
    }

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| SongError::decode(path, format!("no decoder: {}", e)))?;

    let mut samples: Vec<i32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(SongError::decode(path, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            // Corrupt packet, skip it like a player would
            Err(SymphoniaError::DecodeError(e)) => {
                debug!("Skipping undecodable packet: {}", e);
                continue;
            }
            Err(e) => return Err(SongError::decode(path, e)),
        };

        let spec = *decoded.spec();
        channels.get_or_insert(spec.channels.count() as u16);

        let mut sample_buf = SampleBuffer::<i32>::new(decoded.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(sample_buf.samples());
    }

    let channels = channels.unwrap_or(0);
    if channels == 0 || samples.is_empty() {
        return Err(SongError::decode(path, "file contains no audio"));
    }

    let audio = DecodedAudio {
        samples,
        channels,
        sample_rate,
    };

    info!(
        "Decoded audio: {} frames, {} channels, {}Hz, {:.1}s",
        audio.frames(),
        audio.channels,
        audio.sample_rate,
        audio.duration_s()
    );

    Ok(audio)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, channels: u16, sample_rate: u32, frames: usize) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..frames {
            for c in 0..channels {
                writer.write_sample((i as i16 * 7) ^ c as i16).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decode_wav_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, 2, 22_050, 1000);

        let audio = decode_audio(&path).unwrap();
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.sample_rate, 22_050);
        assert_eq!(audio.frames(), 1000);
        // 16-bit samples widen to full-scale 32-bit
        assert_eq!(audio.samples[2], (7i32) << 16);
        assert_eq!(audio.samples[3], (7i32 ^ 1) << 16);
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode_audio(&dir.path().join("audio.flac")).unwrap_err();
        assert!(matches!(err, SongError::Decode { .. }));
    }

    #[test]
    fn test_garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.flac");
        std::fs::write(&path, b"definitely not flac").unwrap();

        let err = decode_audio(&path).unwrap_err();
        assert!(matches!(err, SongError::Decode { .. }));
    }

    #[test]
    fn test_mono_mixdown() {
        let audio = DecodedAudio {
            samples: vec![i32::MAX, i32::MAX, 0, i32::MIN, i32::MIN, i32::MIN],
            channels: 2,
            sample_rate: 44_100,
        };
        let mono = audio.mono();
        assert_eq!(mono.len(), 3);
        assert!((mono[0] - 1.0).abs() < 1e-6);
        assert!((mono[1] + 0.5).abs() < 1e-6);
        assert!((mono[2] + 1.0).abs() < 1e-6);
    }
}
