//! Camera poses and the transitions between them.

use std::fmt;

use glam::{Quat, Vec3};

/// Eye position plus unit orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl CameraPose {
    /// Create pose, normalising the orientation
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation: orientation.normalize(),
        }
    }

    /// Interpolate towards `end`: lerp position, shortest-arc slerp orientation
    pub fn interpolate(&self, end: &CameraPose, progress: f32) -> CameraPose {
        CameraPose {
            position: self.position.lerp(end.position, progress),
            orientation: slerp_shortest(self.orientation, end.orientation, progress),
        }
    }
}

/// Prints the pose as a pasteable keyframe literal
impl fmt::Display for CameraPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position;
        let q = self.orientation;
        write!(
            f,
            "CameraPose::new(Vec3::new({:.4}, {:.4}, {:.4}), Quat::from_xyzw({:.4}, {:.4}, {:.4}, {:.4}))",
            p.x, p.y, p.z, q.x, q.y, q.z, q.w
        )
    }
}

/// Slerp that never takes the long way round.
///
/// `q` and `-q` encode the same rotation; when the inputs sit in opposite
/// hemispheres the end is negated so the path stays under 180°.
pub fn slerp_shortest(start: Quat, end: Quat, t: f32) -> Quat {
    let end = if start.dot(end) < 0.0 { -end } else { end };
    start.slerp(end, t).normalize()
}

/// One authored camera move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransition {
    pub start: CameraPose,
    pub end: CameraPose,
    /// Interpolation time (seconds, > 0)
    pub duration_s: f32,
}

impl CameraTransition {
    pub fn new(start: CameraPose, end: CameraPose, duration_s: f32) -> Self {
        debug_assert!(duration_s > 0.0, "transition duration must be positive");
        Self {
            start,
            end,
            duration_s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slerp_shortest_negates_opposite_hemisphere() {
        let start = Quat::IDENTITY;
        let end = -Quat::from_rotation_y(0.5);
        assert!(start.dot(end) < 0.0);

        for i in 0..=20 {
            let t = i as f32 / 20.0;
            let q = slerp_shortest(start, end, t);
            // Never further than the endpoints are apart
            assert!(q.angle_between(start) <= 0.5 + 1e-3, "t={} angle={}", t, q.angle_between(start));
        }

        let mid = slerp_shortest(start, end, 0.5);
        assert!(mid.angle_between(Quat::from_rotation_y(0.25)) < 2e-3);
    }

    #[test]
    fn test_interpolate_endpoints() {
        let a = CameraPose::new(Vec3::ZERO, Quat::IDENTITY);
        let b = CameraPose::new(Vec3::new(10.0, 2.0, -4.0), Quat::from_rotation_x(1.0));

        let at_start = a.interpolate(&b, 0.0);
        assert!(at_start.position.distance(a.position) < 1e-6);
        assert!(at_start.orientation.angle_between(a.orientation) < 2e-3);

        let at_end = a.interpolate(&b, 1.0);
        assert!(at_end.position.distance(b.position) < 1e-5);
        assert!(at_end.orientation.angle_between(b.orientation) < 2e-3);
    }

    #[test]
    fn test_pose_normalises_orientation() {
        let pose = CameraPose::new(Vec3::ZERO, Quat::from_xyzw(-0.1557, -0.0280, -0.0044, 0.9874));
        assert!((pose.orientation.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_display_is_keyframe_literal() {
        let pose = CameraPose::new(Vec3::new(1.0, -2.5, 3.25), Quat::IDENTITY);
        assert_eq!(
            pose.to_string(),
            "CameraPose::new(Vec3::new(1.0000, -2.5000, 3.2500), \
             Quat::from_xyzw(0.0000, 0.0000, 0.0000, 1.0000))"
        );
    }
}
