//! Keyframed camera animation with audio-reactive shake.

mod animator;
mod keyframes;
mod pose;

pub use animator::CameraAnimator;
pub use keyframes::default_transitions;
pub use pose::{slerp_shortest, CameraPose, CameraTransition};
