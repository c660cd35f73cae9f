//! Built-in camera tour around the bars.
//!
//! Poses were captured with the free camera and the "capture pose" control,
//! which prints them in exactly this form.

use glam::{Quat, Vec3};

use super::pose::{CameraPose, CameraTransition};

fn pose(x: f32, y: f32, z: f32, qx: f32, qy: f32, qz: f32, qw: f32) -> CameraPose {
    CameraPose::new(Vec3::new(x, y, z), Quat::from_xyzw(qx, qy, qz, qw))
}

/// The default looping tour (eight moves, ~68 seconds)
pub fn default_transitions() -> Vec<CameraTransition> {
    vec![
        // Descend from above onto the bar row
        CameraTransition::new(
            pose(5.8471, 9.6994, 38.2727, -0.1557, -0.0280, -0.0044, 0.9874),
            pose(7.0729, 0.8221, 12.5933, -0.0140, -0.0130, -0.0002, 0.9998),
            8.0,
        ),
        // Fast sweep from behind
        CameraTransition::new(
            pose(-18.6687, 2.6341, -26.7555, -0.0160, -0.9401, -0.0447, 0.3377),
            pose(-7.5872, 2.6341, 28.1043, -0.0354, -0.2255, -0.0082, 0.9736),
            3.0,
        ),
        // Ground-level truck left to right
        CameraTransition::new(
            pose(-7.8656, 0.0000, 11.5408, 0.0051, -0.4020, 0.0022, 0.9156),
            pose(22.7046, 0.0000, 10.8279, 0.0051, 0.3935, -0.0022, 0.9193),
            10.0,
        ),
        CameraTransition::new(
            pose(0.0428, 0.7932, 7.3945, -0.0431, -0.1007, -0.0044, 0.9940),
            pose(17.3785, 0.7932, 15.6179, -0.0313, 0.2251, 0.0072, 0.9738),
            10.0,
        ),
        // Low angle, looking up
        CameraTransition::new(
            pose(-1.4514, -4.1163, 9.5621, 0.1828, -0.2591, 0.0500, 0.9471),
            pose(14.7786, -1.4914, 8.8891, 0.0778, 0.2476, -0.0199, 0.9655),
            10.0,
        ),
        // Crane from below to above
        CameraTransition::new(
            pose(7.3091, -16.7948, 16.1069, 0.3782, -0.0047, 0.0019, 0.9257),
            pose(7.1402, 18.2470, 16.4410, -0.3929, -0.0047, -0.0020, 0.9196),
            10.0,
        ),
        CameraTransition::new(
            pose(6.7887, -0.4598, 16.6968, 0.0544, 0.0014, -0.0001, 0.9985),
            pose(6.6380, -10.7140, 27.1954, 0.2052, -0.0082, 0.0017, 0.9787),
            10.0,
        ),
        // Pull out from far below and swing back in
        CameraTransition::new(
            pose(9.0587, -31.1216, 66.6940, 0.1846, 0.0220, -0.0041, 0.9826),
            pose(-4.8753, 15.8279, 15.4221, -0.3416, -0.2552, -0.0969, 0.8993),
            7.0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transitions_well_formed() {
        let transitions = default_transitions();
        assert_eq!(transitions.len(), 8);

        for (i, t) in transitions.iter().enumerate() {
            assert!(t.duration_s > 0.0, "transition {} has no duration", i);
            assert!((t.start.orientation.length() - 1.0).abs() < 1e-5);
            assert!((t.end.orientation.length() - 1.0).abs() < 1e-5);
        }

        let total: f32 = transitions.iter().map(|t| t.duration_s).sum();
        assert_eq!(total, 68.0);
    }
}
