//! Free-camera debug controls.

/// Free camera movement parameters
#[derive(Debug, Clone)]
pub struct FreeCamConfig {
    /// Movement speed (meters per second)
    pub speed_m_per_s: f32,

    /// Speed multiplier while boosting
    pub boost_scale: f32,

    /// Mouse sensitivity (degrees per 10 pixels)
    pub pointer_speed: f32,
}

impl Default for FreeCamConfig {
    fn default() -> Self {
        Self {
            speed_m_per_s: 2.5,
            boost_scale: 3.0,
            pointer_speed: 1.6,
        }
    }
}
