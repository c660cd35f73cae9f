//! One song: decoded audio, its spectrum dataset, and the playback position.
//!
//! Layout on disk is `<data_dir>/songs/<name>/{audio.flac, spectrum.bin}`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;

use crate::audio::{
    decode_audio, AudioMixer, ConversionStream, DecodedAudio, PcmFormat, PlaybackState,
};
use crate::error::SongError;
use crate::spectrum::SpectrumDataset;

pub const AUDIO_FILE: &str = "audio.flac";
pub const SPECTRUM_FILE: &str = "spectrum.bin";

/// Directory holding the assets of `song_name`
pub fn song_dir(data_dir: &Path, song_name: &str) -> PathBuf {
    data_dir.join("songs").join(song_name)
}

/// Loaded song, ready for audio setup
pub struct SongData {
    name: String,
    spectrum: SpectrumDataset,
    /// Decoded PCM until it is handed to the conversion stream
    pcm: Option<DecodedAudio>,
    playback: Arc<PlaybackState>,
}

impl SongData {
    /// Load `<data_dir>/songs/<song_name>`
    pub fn open(data_dir: &Path, song_name: &str) -> Result<Self, SongError> {
        Self::load(&song_dir(data_dir, song_name))
    }

    /// Decode the audio and read the spectrum dataset from `dir`
    pub fn load(dir: &Path) -> Result<Self, SongError> {
        let audio_path = dir.join(AUDIO_FILE);
        let spectrum_path = dir.join(SPECTRUM_FILE);

        info!("Song audio: {}", audio_path.display());
        info!("Song spectrum: {}", spectrum_path.display());

        let pcm = decode_audio(&audio_path)?;
        let spectrum = SpectrumDataset::load(&spectrum_path)?;

        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::from_parts(name, pcm, spectrum))
    }

    /// Assemble a song from already loaded parts
    pub fn from_parts(
        name: impl Into<String>,
        pcm: DecodedAudio,
        spectrum: SpectrumDataset,
    ) -> Self {
        let playback = Arc::new(PlaybackState::new(
            spectrum.block_size_samples,
            spectrum.sample_rate,
        ));
        Self {
            name: name.into(),
            spectrum,
            pcm: Some(pcm),
            playback,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spectrum(&self) -> &SpectrumDataset {
        &self.spectrum
    }

    pub fn playback(&self) -> &Arc<PlaybackState> {
        &self.playback
    }

    /// Native format of the decoded PCM, `None` once audio is set up
    pub fn requested_format(&self) -> Option<PcmFormat> {
        self.pcm.as_ref().map(DecodedAudio::format)
    }

    /// Build the conversion stream for the `obtained` device format.
    ///
    /// The entire song is converted and queued here. Consumes the decoded
    /// PCM, so a second call fails.
    pub fn setup_audio(
        &mut self,
        obtained: PcmFormat,
        muted: bool,
    ) -> Result<AudioMixer, SongError> {
        let pcm = self
            .pcm
            .take()
            .ok_or_else(|| SongError::AudioSetup("audio already set up".to_string()))?;

        let stream = ConversionStream::new(&pcm, obtained)?;
        self.playback.set_device_rate(obtained.sample_rate);

        Ok(AudioMixer::new(stream, Arc::clone(&self.playback), muted))
    }

    /// Audible block, unclamped
    pub fn current_block_index(&self) -> usize {
        self.playback.current_block_index()
    }

    /// True once the song has played to the end
    pub fn is_finished(&self) -> bool {
        self.playback.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SampleFormat;
    use crate::spectrum::tests::sample_dataset;

    fn song() -> SongData {
        let pcm = DecodedAudio {
            samples: vec![7; 2048 * 2],
            channels: 2,
            sample_rate: 44_100,
        };
        SongData::from_parts("test", pcm, sample_dataset())
    }

    fn write_wav(path: &Path, frames: usize) {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..frames * 2 {
            writer.write_sample(i as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_setup_audio_then_play_to_end() {
        let mut song = song();
        let format = song.requested_format().unwrap();
        let mut mixer = song.setup_audio(format, false).unwrap();
        assert!(song.requested_format().is_none());

        let mut out = vec![0u8; 2048];
        mixer.mix_audio(&mut out);
        mixer.mix_audio(&mut out);
        assert_eq!(song.current_block_index(), 1);

        while mixer.mix_audio(&mut out) > 0 {}
        assert!(song.is_finished());
        assert_eq!(song.playback().audio_position_samples(), 2048);
        assert_eq!(song.current_block_index(), 4);
        assert_eq!(song.spectrum().clamp_block_index(song.current_block_index()), 2);
    }

    #[test]
    fn test_second_setup_fails() {
        let mut song = song();
        let format = song.requested_format().unwrap();
        song.setup_audio(format, true).unwrap();

        let err = song.setup_audio(format, true).err().unwrap();
        assert!(matches!(err, SongError::AudioSetup(_)));
    }

    #[test]
    fn test_setup_audio_device_format() {
        let mut song = song();
        let obtained = PcmFormat {
            sample_format: SampleFormat::F32,
            channels: 1,
            sample_rate: 44_100,
        };
        let mixer = song.setup_audio(obtained, false).unwrap();
        assert_eq!(mixer.format(), obtained);
    }

    #[test]
    fn test_open_song_directory() {
        let data = tempfile::tempdir().unwrap();
        let dir = song_dir(data.path(), "demo");
        std::fs::create_dir_all(&dir).unwrap();
        // symphonia detects the format from content, the extension is only a hint
        write_wav(&dir.join(AUDIO_FILE), 600);
        sample_dataset().save(&dir.join(SPECTRUM_FILE)).unwrap();

        let song = SongData::open(data.path(), "demo").unwrap();
        assert_eq!(song.name(), "demo");
        assert_eq!(song.spectrum().num_blocks(), 3);
        assert_eq!(song.requested_format().unwrap().channels, 2);
        assert_eq!(song.current_block_index(), 0);
        assert!(!song.is_finished());
    }

    #[test]
    fn test_missing_song_is_decode_error() {
        let data = tempfile::tempdir().unwrap();
        let err = SongData::open(data.path(), "nope").err().unwrap();
        assert!(matches!(err, SongError::Decode { .. }));
    }

    #[test]
    fn test_missing_spectrum_is_dataset_error() {
        let data = tempfile::tempdir().unwrap();
        let dir = song_dir(data.path(), "demo");
        std::fs::create_dir_all(&dir).unwrap();
        write_wav(&dir.join(AUDIO_FILE), 100);

        let err = SongData::open(data.path(), "demo").err().unwrap();
        assert!(matches!(err, SongError::Dataset { .. }));
    }
}
