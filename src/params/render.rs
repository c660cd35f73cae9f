//! Projection configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Viewport width (pixels)
    pub window_width: u32,

    /// Viewport height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (meters)
    pub near_plane_m: f32,

    /// Far clipping plane (meters)
    pub far_plane_m: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1600,
            window_height: 900,
            fov_degrees: 55.0,
            near_plane_m: 0.1,
            far_plane_m: 200.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}
