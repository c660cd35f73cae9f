//! Camera animator: walks the authored transitions, one pose per frame.

use glam::{Quat, Vec3};
use log::info;

use super::pose::{CameraPose, CameraTransition};
use crate::camera::CameraRig;
use crate::noise::ShakeNoise;
use crate::params::AnimatorConfig;
use crate::util::map_range;

/// Noise rows sampled for the X, Y and Z shake axes
const SHAKE_AXES: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];

/// Drives a camera through a looping sequence of transitions
pub struct CameraAnimator {
    config: AnimatorConfig,
    noise: ShakeNoise,
    transitions: Vec<CameraTransition>,

    /// Active transition, `None` until the first update
    current: Option<usize>,
    /// Seconds into the active transition (possibly energy-scaled)
    elapsed_in_segment: f32,
    /// Unscaled seconds since start, the shake noise phase
    total_elapsed: f32,
    /// Next update moves to the following transition
    advance_pending: bool,
}

impl CameraAnimator {
    /// Create animator with no transitions
    pub fn new(config: AnimatorConfig) -> Self {
        let noise = ShakeNoise::new(&config.noise);
        Self {
            config,
            noise,
            transitions: Vec::new(),
            current: None,
            elapsed_in_segment: 0.0,
            total_elapsed: 0.0,
            // The very first update starts transition 0
            advance_pending: true,
        }
    }

    /// Append one transition (setup only, before the first update)
    pub fn add_transition(&mut self, transition: CameraTransition) {
        self.transitions.push(transition);
    }

    /// Append a sequence of transitions (setup only, before the first update)
    pub fn add_transitions(&mut self, transitions: impl IntoIterator<Item = CameraTransition>) {
        self.transitions.extend(transitions);
    }

    /// Skip to the next transition on the following update
    pub fn force_advance_transition(&mut self) {
        self.advance_pending = true;
    }

    pub fn transitions(&self) -> &[CameraTransition] {
        &self.transitions
    }

    /// Index of the active transition, `None` before the first update
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn elapsed_in_segment(&self) -> f32 {
        self.elapsed_in_segment
    }

    pub fn total_elapsed(&self) -> f32 {
        self.total_elapsed
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// Advance one frame and push the resulting pose to `camera`.
    ///
    /// Returns `None` when there is nothing to animate, or on the frame where
    /// the active transition completes; the caller keeps last frame's pose.
    pub fn update<R>(
        &mut self,
        delta_s: f32,
        spectral_energy_ratio: f32,
        camera: &mut R,
    ) -> Option<CameraPose>
    where
        R: CameraRig + ?Sized,
    {
        if self.transitions.is_empty() {
            return None;
        }

        if self.advance_pending {
            let next = match self.current {
                Some(index) => (index + 1) % self.transitions.len(),
                None => 0,
            };
            info!(
                "Advancing camera animation ({}/{})",
                next + 1,
                self.transitions.len()
            );
            self.current = Some(next);
            self.elapsed_in_segment = 0.0;
            self.advance_pending = false;
        }

        let transition = self.transitions[self.current.unwrap_or(0)];

        let progress = self.elapsed_in_segment / transition.duration_s;
        if progress >= 1.0 {
            self.advance_pending = true;
            return None;
        }

        let mut pose = transition.start.interpolate(&transition.end, progress);

        if self.config.shake_orientation {
            pose.orientation = self.shake(pose.orientation, spectral_energy_ratio);
        }

        camera.set_camera_pose(pose.position, pose.orientation);

        if self.config.shake_fov {
            let (min_fov, max_fov) = self.config.fov_range_degrees;
            let fov = map_range(
                0.0,
                1.0,
                min_fov as f64,
                max_fov as f64,
                spectral_energy_ratio as f64,
            );
            camera.set_fov(fov as f32);
        }

        // Energy-paced segments give the "stop and go" look
        let segment_delta = match self.config.scale_camera_moves {
            Some(scale) => {
                let multiplier = map_range(
                    0.0,
                    1.0,
                    scale.min as f64,
                    scale.max as f64,
                    spectral_energy_ratio as f64,
                );
                multiplier as f32 * delta_s
            }
            None => delta_s,
        };
        self.elapsed_in_segment += segment_delta;
        // Noise phase always runs on real time
        self.total_elapsed += delta_s;

        Some(pose)
    }

    /// Compose energy-scaled noise rotations (X, then Y, then Z) onto `orientation`
    fn shake(&self, orientation: Quat, spectral_energy_ratio: f32) -> Quat {
        let scale = spectral_energy_ratio * self.config.shake_scale;
        SHAKE_AXES
            .iter()
            .enumerate()
            .fold(orientation, |q, (axis_index, axis)| {
                let angle = self.noise.sample(self.total_elapsed, axis_index) * scale;
                q * Quat::from_axis_angle(*axis, angle)
            })
            .normalize()
    }
}
