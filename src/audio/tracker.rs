//! Playback position shared between the audio callback and the render loop.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use super::format::PcmFormat;
use super::stream::ConversionStream;

/// Cross-thread playback position.
///
/// Written only by the output callback (Release), read once per frame by
/// the render loop (Acquire).
#[derive(Debug)]
pub struct PlaybackState {
    /// Frames (samples per channel) handed to the device so far
    position_samples: AtomicU64,

    /// Set once the conversion stream ran dry
    finished: AtomicBool,

    block_size_samples: u64,

    /// Rate the spectrum blocks were computed at (Hz)
    dataset_rate: u32,

    /// Rate the device plays at (Hz), equals `dataset_rate` until negotiated
    device_rate: AtomicU32,
}

impl PlaybackState {
    pub fn new(block_size_samples: u32, dataset_rate: u32) -> Self {
        Self {
            position_samples: AtomicU64::new(0),
            finished: AtomicBool::new(false),
            block_size_samples: block_size_samples.max(1) as u64,
            dataset_rate,
            device_rate: AtomicU32::new(dataset_rate),
        }
    }

    /// Record the negotiated device rate
    pub fn set_device_rate(&self, sample_rate: u32) {
        self.device_rate.store(sample_rate, Ordering::Release);
    }

    /// Frames delivered to the device so far
    pub fn audio_position_samples(&self) -> u64 {
        self.position_samples.load(Ordering::Acquire)
    }

    /// Spectrum block currently audible, unclamped.
    ///
    /// Device positions are mapped back onto the dataset timeline when the
    /// device plays at a different rate.
    pub fn current_block_index(&self) -> usize {
        let position = self.audio_position_samples();
        let device_rate = self.device_rate.load(Ordering::Acquire);

        let dataset_position = if device_rate == self.dataset_rate || device_rate == 0 {
            position
        } else {
            (position as u128 * self.dataset_rate as u128 / device_rate as u128) as u64
        };

        (dataset_position / self.block_size_samples) as usize
    }

    /// True once playback reached the end of the song
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    fn advance(&self, frames: u64) {
        self.position_samples.fetch_add(frames, Ordering::Release);
    }

    fn mark_finished(&self) {
        self.finished.store(true, Ordering::Release);
    }
}

/// Real-time side of playback, owned by the output callback
pub struct AudioMixer {
    stream: ConversionStream,
    state: Arc<PlaybackState>,
    bytes_per_frame: usize,
    muted: bool,
}

impl AudioMixer {
    pub fn new(stream: ConversionStream, state: Arc<PlaybackState>, muted: bool) -> Self {
        let bytes_per_frame = stream.format().bytes_per_frame().max(1);
        Self {
            stream,
            state,
            bytes_per_frame,
            muted,
        }
    }

    pub fn format(&self) -> PcmFormat {
        self.stream.format()
    }

    pub fn state(&self) -> &Arc<PlaybackState> {
        &self.state
    }

    /// Fill `out` from the stream and advance the playback position.
    ///
    /// Never blocks or allocates. Pulls at most the bytes available, rounded
    /// down to whole frames; anything in `out` past that is silence. Once
    /// the stream is empty every call yields silence and the position stays
    /// put. Returns the number of bytes taken from the stream.
    pub fn mix_audio(&mut self, out: &mut [u8]) -> usize {
        let available = self.stream.available();
        if available == 0 {
            out.fill(0);
            self.state.mark_finished();
            return 0;
        }

        let len = out.len().min(available);
        let len = len - len % self.bytes_per_frame;

        let pulled = self.stream.get(&mut out[..len]);
        out[pulled..].fill(0);

        if self.muted {
            out[..pulled].fill(0);
        }

        self.state.advance((pulled / self.bytes_per_frame) as u64);

        pulled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{DecodedAudio, SampleFormat};

    /// Stereo I32 mixer over `frames` frames of non-zero samples
    fn mixer(frames: usize, block_size: u32, muted: bool) -> AudioMixer {
        let audio = DecodedAudio {
            samples: vec![0x0101_0101; frames * 2],
            channels: 2,
            sample_rate: 44_100,
        };
        let stream = ConversionStream::new(&audio, audio.format()).unwrap();
        let state = Arc::new(PlaybackState::new(block_size, 44_100));
        AudioMixer::new(stream, state, muted)
    }

    #[test]
    fn test_two_callbacks_reach_block_one() {
        let mut mixer = mixer(4096, 512, false);
        let mut out = vec![0u8; 2048];

        assert_eq!(mixer.mix_audio(&mut out), 2048);
        assert_eq!(mixer.state().audio_position_samples(), 256);
        assert_eq!(mixer.state().current_block_index(), 0);

        assert_eq!(mixer.mix_audio(&mut out), 2048);
        assert_eq!(mixer.state().audio_position_samples(), 512);
        assert_eq!(mixer.state().current_block_index(), 1);
        assert!(out.iter().all(|b| *b == 1));
    }

    #[test]
    fn test_position_monotonic_and_exact() {
        let mut mixer = mixer(1000, 512, false);
        let mut last = 0;

        for request in [64usize, 8, 1024, 16, 4096, 800, 2048] {
            let mut out = vec![0u8; request];
            let got = mixer.mix_audio(&mut out);
            let position = mixer.state().audio_position_samples();

            assert!(position >= last);
            assert_eq!(position - last, (got / 8) as u64);
            last = position;
        }
        assert_eq!(last, 1000);
    }

    #[test]
    fn test_partial_frame_request_rounds_down() {
        let mut mixer = mixer(10, 512, false);
        let mut out = vec![0xAAu8; 12];

        assert_eq!(mixer.mix_audio(&mut out), 8);
        assert_eq!(mixer.state().audio_position_samples(), 1);
        assert_eq!(&out[8..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_end_of_stream_is_silence() {
        let mut mixer = mixer(300, 512, false);
        let mut out = vec![0xAAu8; 2048];

        // 256 frames, then the remaining 44 with a zeroed tail
        assert_eq!(mixer.mix_audio(&mut out), 2048);
        assert_eq!(mixer.mix_audio(&mut out), 44 * 8);
        assert!(out[44 * 8..].iter().all(|b| *b == 0));
        assert!(!mixer.state().is_finished());

        for _ in 0..3 {
            out.fill(0xAA);
            assert_eq!(mixer.mix_audio(&mut out), 0);
            assert!(out.iter().all(|b| *b == 0));
            assert_eq!(mixer.state().audio_position_samples(), 300);
        }
        assert!(mixer.state().is_finished());
    }

    #[test]
    fn test_muted_advances_silently() {
        let mut mixer = mixer(512, 256, true);
        let mut out = vec![0xAAu8; 1024];

        assert_eq!(mixer.mix_audio(&mut out), 1024);
        assert!(out.iter().all(|b| *b == 0));
        assert_eq!(mixer.state().audio_position_samples(), 128);
    }

    #[test]
    fn test_block_index_maps_device_rate() {
        let state = PlaybackState::new(512, 44_100);
        state.set_device_rate(88_200);
        state.advance(2048);

        // 2048 device frames at twice the rate are 1024 dataset frames
        assert_eq!(state.current_block_index(), 2);
        assert_eq!(state.audio_position_samples(), 2048);
    }

    #[test]
    fn test_mixer_reports_format() {
        let mixer = mixer(4, 512, false);
        assert_eq!(mixer.format().sample_format, SampleFormat::I32);
        assert_eq!(mixer.format().channels, 2);
    }
}
