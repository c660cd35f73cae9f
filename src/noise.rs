//! Coherent noise for camera shake.
//!
//! Fractal Brownian motion over OpenSimplex gradient noise: smooth in time,
//! deterministic for a given seed, and roughly bounded to [-1, 1].

use noise::{Fbm, MultiFractal, NoiseFn, OpenSimplex};

use crate::params::ShakeNoiseConfig;

/// Noise generator for per-axis camera shake
pub struct ShakeNoise {
    fbm: Fbm<OpenSimplex>,
}

impl ShakeNoise {
    /// Create new shake noise from configuration
    pub fn new(config: &ShakeNoiseConfig) -> Self {
        let fbm = Fbm::<OpenSimplex>::new(config.seed)
            .set_octaves(config.octaves.max(1))
            .set_lacunarity(config.lacunarity)
            .set_persistence(config.gain);
        Self { fbm }
    }

    /// Sample the noise for one rotation axis at time `time_s`
    ///
    /// Each axis reads its own row of the 2D noise field so the three axes
    /// are decorrelated but share the same time base.
    pub fn sample(&self, time_s: f32, axis: usize) -> f32 {
        self.fbm.get([time_s as f64, axis as f64]) as f32
    }
}
