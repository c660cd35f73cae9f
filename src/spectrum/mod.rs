//! Precomputed per-block spectrum data (`spectrum.bin`).
//!
//! Written once by the analysis pass, read in full before playback starts,
//! and immutable afterwards.

pub mod analysis;

use std::fs;
use std::path::Path;

use bincode::Options;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::SongError;

/// Per-block bar magnitudes and spectral energy for one song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumDataset {
    /// Audio sample rate the blocks were computed at (Hz)
    pub sample_rate: u32,

    /// Audio samples (per channel) covered by one block
    pub block_size_samples: u32,

    /// Number of visualiser bars
    pub num_bars: u32,

    /// One `num_bars`-long row of 0-255 magnitudes per block
    pub blocks: Vec<Vec<u8>>,

    /// Spectral energy per block, parallel to `blocks`
    pub spectral_energy_per_block: Vec<f64>,

    /// Maximum of `spectral_energy_per_block`
    pub max_spectral_energy: f64,
}

/// Fixed-width little-endian encoding, trailing bytes rejected
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
}

impl SpectrumDataset {
    /// Read and validate a dataset file
    pub fn load(path: &Path) -> Result<Self, SongError> {
        let bytes = fs::read(path).map_err(|e| SongError::dataset(path, e))?;

        // Nothing in the file can legitimately decode to more than its own size
        let dataset: SpectrumDataset = codec()
            .with_limit(bytes.len() as u64)
            .deserialize(&bytes)
            .map_err(|e| SongError::dataset(path, e))?;

        dataset
            .validate()
            .map_err(|reason| SongError::dataset(path, reason))?;

        info!(
            "Spectrum: {} bars, {} Hz, {} samples/block, {} blocks",
            dataset.num_bars,
            dataset.sample_rate,
            dataset.block_size_samples,
            dataset.num_blocks()
        );

        Ok(dataset)
    }

    /// Serialize the dataset to `path`
    pub fn save(&self, path: &Path) -> Result<(), SongError> {
        let bytes = codec()
            .serialize(self)
            .map_err(|e| SongError::dataset(path, e))?;
        fs::write(path, bytes).map_err(|source| SongError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Structural checks the render loop relies on
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be > 0".to_string());
        }
        if self.block_size_samples == 0 {
            return Err("block size must be > 0".to_string());
        }
        if self.blocks.is_empty() {
            return Err("dataset has no blocks".to_string());
        }
        if self.blocks.len() != self.spectral_energy_per_block.len() {
            return Err(format!(
                "{} blocks but {} energy values",
                self.blocks.len(),
                self.spectral_energy_per_block.len()
            ));
        }
        if let Some((index, block)) = self
            .blocks
            .iter()
            .enumerate()
            .find(|(_, block)| block.len() != self.num_bars as usize)
        {
            return Err(format!(
                "block {} has {} bars, expected {}",
                index,
                block.len(),
                self.num_bars
            ));
        }
        if !self.max_spectral_energy.is_finite() || self.max_spectral_energy < 0.0 {
            return Err(format!(
                "max spectral energy must be finite and >= 0, got {}",
                self.max_spectral_energy
            ));
        }
        if let Some((index, energy)) = self
            .spectral_energy_per_block
            .iter()
            .enumerate()
            .find(|(_, energy)| !energy.is_finite() || **energy < 0.0)
        {
            return Err(format!(
                "block {} energy must be finite and >= 0, got {}",
                index, energy
            ));
        }
        // Normalised energy must stay within 0-1
        let max = self
            .spectral_energy_per_block
            .iter()
            .copied()
            .fold(0.0, f64::max);
        if max != self.max_spectral_energy {
            return Err(format!(
                "max spectral energy {} does not match block maximum {}",
                self.max_spectral_energy, max
            ));
        }
        Ok(())
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Clamp a raw playback block index into `0..num_blocks`
    ///
    /// Playback can report `num_blocks` on its last partial delivery.
    pub fn clamp_block_index(&self, index: usize) -> usize {
        index.min(self.blocks.len().saturating_sub(1))
    }

    /// Bar magnitudes for `index` (clamped)
    pub fn block(&self, index: usize) -> &[u8] {
        &self.blocks[self.clamp_block_index(index)]
    }

    /// Block energy divided by the song maximum (clamped index, 0 for a silent song)
    pub fn normalized_energy(&self, index: usize) -> f32 {
        if self.max_spectral_energy <= 0.0 {
            return 0.0;
        }
        let energy = self.spectral_energy_per_block[self.clamp_block_index(index)];
        (energy / self.max_spectral_energy) as f32
    }

    /// Song duration covered by the blocks (seconds)
    pub fn duration_s(&self) -> f64 {
        self.blocks.len() as f64 * self.block_size_samples as f64 / self.sample_rate as f64
    }
}
