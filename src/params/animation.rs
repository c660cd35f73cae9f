//! Camera animator configuration (shake, FOV pulse, energy-driven pacing).

/// Fractal noise parameters for procedural camera shake
#[derive(Debug, Clone)]
pub struct ShakeNoiseConfig {
    /// Number of noise octaves summed (more = rougher detail)
    pub octaves: usize,

    /// Frequency multiplier between octaves
    pub lacunarity: f64,

    /// Amplitude multiplier between octaves (1.0 = all octaves equal weight)
    pub gain: f64,

    /// Noise permutation seed
    pub seed: u32,
}

impl Default for ShakeNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 4,
            lacunarity: 1.7,
            gain: 1.0,
            seed: 0,
        }
    }
}

/// Mapping of spectral energy ratio to a segment-time multiplier.
///
/// A ratio of 0.0 advances segments at `min` times real time, 1.0 at `max`.
/// There is no canonical curve, songs pick their own bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElapsedScale {
    /// Multiplier at silence
    pub min: f32,

    /// Multiplier at peak energy
    pub max: f32,
}

/// Camera animator behaviour
#[derive(Debug, Clone)]
pub struct AnimatorConfig {
    /// Perturb orientation with energy-scaled noise
    pub shake_orientation: bool,

    /// Widen field of view with energy
    pub shake_fov: bool,

    /// Scale segment progress by energy (off when `None`)
    pub scale_camera_moves: Option<ElapsedScale>,

    /// Shake amplitude at energy ratio 1.0 (radians per axis, before noise)
    pub shake_scale: f32,

    /// Noise used for shake
    pub noise: ShakeNoiseConfig,

    /// FOV at energy 0.0 and 1.0 when `shake_fov` is set (degrees)
    pub fov_range_degrees: (f32, f32),
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            shake_orientation: true,
            shake_fov: false,
            scale_camera_moves: None,
            shake_scale: 0.07,
            noise: ShakeNoiseConfig::default(),
            fov_range_degrees: (55.0, 65.0),
        }
    }
}

impl AnimatorConfig {
    /// Pure interpolation, no audio-driven effects
    pub fn steady() -> Self {
        Self {
            shake_orientation: false,
            ..Self::default()
        }
    }
}
