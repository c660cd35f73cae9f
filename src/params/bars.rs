//! Bar layout in world space.

/// Bar geometry (unit cube scaled per bar)
#[derive(Debug, Clone)]
pub struct BarLayout {
    /// Distance between adjacent bars along X (meters)
    pub spacing_m: f32,

    /// Uniform scale applied to every bar
    pub scaling: f32,

    /// Extra X/Z scale on top of `scaling`
    pub width_multiplier: f32,

    /// Height at magnitude 0 (multiplied by `scaling`)
    pub min_height: f32,

    /// Height at magnitude 255 (multiplied by `scaling`)
    pub max_height: f32,
}

impl Default for BarLayout {
    fn default() -> Self {
        Self {
            spacing_m: 2.5,
            scaling: 0.1,
            width_multiplier: 2.0,
            min_height: 1.0,
            max_height: 50.0,
        }
    }
}
