//! Parameter definitions with physical units and documented semantics.
//!
//! All tunable numbers live here with:
//! - Physical units (meters, seconds, Hz, degrees)
//! - Documented ranges and meanings
//! - `Default` values matching the shipped visualiser

mod animation;
mod audio;
mod bars;
mod camera;
mod render;

// Re-export all types
pub use animation::{AnimatorConfig, ElapsedScale, ShakeNoiseConfig};
pub use audio::{AnalysisConfig, PlaybackConfig};
pub use bars::BarLayout;
pub use camera::FreeCamConfig;
pub use render::RenderConfig;
