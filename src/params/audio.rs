//! Playback and offline analysis configuration.

/// Output device playback configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Requested device buffer size (frames per callback)
    /// Small buffers keep block tracking fine-grained; too small glitches.
    pub buffer_frames: u32,

    /// Requested output channel count
    pub channels: u16,

    /// Advance playback but write silence
    pub muted: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            buffer_frames: 128, // ~2.9ms @ 44.1kHz
            channels: 2,
            muted: false,
        }
    }
}

/// Spectrum analysis configuration (generates `spectrum.bin`)
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Samples per spectral block (FFT size)
    pub block_size: usize,

    /// Number of visualiser bars
    pub num_bars: usize,

    /// Lowest bar edge (Hz)
    pub freq_min_hz: f32,

    /// Highest bar edge (Hz), capped at Nyquist
    pub freq_max_hz: f32,

    /// Magnitude mapped to bar value 0 (dB relative to full scale)
    pub floor_db: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            block_size: 2048,
            num_bars: 32,
            freq_min_hz: 20.0,     // Human hearing range
            freq_max_hz: 20_000.0,
            floor_db: -80.0,
        }
    }
}

impl AnalysisConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.block_size < 2 {
            return Err(format!("Block size must be >= 2, got {}", self.block_size));
        }
        if self.num_bars == 0 {
            return Err("Bar count must be > 0".to_string());
        }
        if !(self.freq_min_hz > 0.0 && self.freq_min_hz < self.freq_max_hz) {
            return Err(format!(
                "Invalid frequency range {}..{} Hz",
                self.freq_min_hz, self.freq_max_hz
            ));
        }
        if self.floor_db >= 0.0 {
            return Err(format!("Floor must be below 0 dB, got {}", self.floor_db));
        }
        Ok(())
    }
}
