//! Offline spectrum analysis: decoded PCM in, `SpectrumDataset` out.
//!
//! The song is mixed to mono and cut into fixed blocks; each block gets a
//! Hann-windowed FFT whose magnitudes are averaged over log-spaced bands.

use std::f32::consts::PI;
use std::ops::Range;

use log::info;
use rustfft::{num_complex::Complex, FftPlanner};

use super::SpectrumDataset;
use crate::audio::DecodedAudio;
use crate::params::AnalysisConfig;
use crate::util::map_range;

/// Compute a spectrum dataset for `audio`
pub fn analyse(audio: &DecodedAudio, config: &AnalysisConfig) -> Result<SpectrumDataset, String> {
    config
        .validate()
        .map_err(|e| format!("Invalid analysis config: {}", e))?;

    let mono = audio.mono();
    if mono.is_empty() {
        return Err("Audio contains no samples".to_string());
    }

    let bands = band_bins(config, audio.sample_rate)?;

    let fft_size = config.block_size;
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(fft_size);

    let window: Vec<f32> = (0..fft_size).map(|i| hann_window(i, fft_size)).collect();
    // Amplitude normalisation: a full-scale sine reads ~1.0
    let magnitude_scale = 2.0 / window.iter().sum::<f32>();

    let mut buffer = vec![Complex::new(0.0, 0.0); fft_size];
    let mut magnitudes = vec![0.0f32; fft_size / 2 + 1];

    let num_blocks = mono.len().div_ceil(fft_size);
    let mut blocks = Vec::with_capacity(num_blocks);
    let mut energies = Vec::with_capacity(num_blocks);

    for chunk in mono.chunks(fft_size) {
        // Last block is zero padded
        for (i, slot) in buffer.iter_mut().enumerate() {
            let sample = chunk.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * window[i], 0.0);
        }

        fft.process(&mut buffer);

        for (magnitude, bin) in magnitudes.iter_mut().zip(&buffer) {
            *magnitude = bin.norm() * magnitude_scale;
        }

        let energy: f64 = magnitudes.iter().map(|m| (*m as f64) * (*m as f64)).sum();
        energies.push(energy);

        let bars = bands
            .iter()
            .map(|range| {
                let slice = &magnitudes[range.clone()];
                let mean = slice.iter().sum::<f32>() / slice.len() as f32;
                magnitude_to_byte(mean, config.floor_db)
            })
            .collect();
        blocks.push(bars);
    }

    let max_spectral_energy = energies.iter().copied().fold(0.0, f64::max);

    info!(
        "Analysed {} blocks of {} samples into {} bars (max energy {:.3})",
        blocks.len(),
        fft_size,
        config.num_bars,
        max_spectral_energy
    );

    Ok(SpectrumDataset {
        sample_rate: audio.sample_rate,
        block_size_samples: fft_size as u32,
        num_bars: config.num_bars as u32,
        blocks,
        spectral_energy_per_block: energies,
        max_spectral_energy,
    })
}

/// FFT bin range for each bar, log-spaced between the configured edges
fn band_bins(config: &AnalysisConfig, sample_rate: u32) -> Result<Vec<Range<usize>>, String> {
    let nyquist = sample_rate as f32 / 2.0;
    let freq_max = config.freq_max_hz.min(nyquist);
    if config.freq_min_hz >= freq_max {
        return Err(format!(
            "Lowest band edge {} Hz is above Nyquist ({} Hz)",
            config.freq_min_hz, nyquist
        ));
    }

    let bin_hz = sample_rate as f32 / config.block_size as f32;
    let last_bin = config.block_size / 2;
    let ratio = freq_max / config.freq_min_hz;

    let edge = |i: usize| config.freq_min_hz * ratio.powf(i as f32 / config.num_bars as f32);

    Ok((0..config.num_bars)
        .map(|i| {
            let start = ((edge(i) / bin_hz).floor() as usize).min(last_bin);
            let end = ((edge(i + 1) / bin_hz).ceil() as usize).clamp(start + 1, last_bin + 1);
            start..end
        })
        .collect())
}

/// Map a linear magnitude to 0-255 over `[floor_db, 0 dB]`
fn magnitude_to_byte(magnitude: f32, floor_db: f32) -> u8 {
    let db = 20.0 * magnitude.max(1e-10).log10();
    map_range(floor_db as f64, 0.0, 0.0, 255.0, db as f64)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
