//! Camera state and the render-backend camera contract.
//!
//! A single concrete perspective camera. View and projection matrices are
//! computed on demand from the current pose, nothing is cached.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

use crate::animation::CameraPose;
use crate::params::{FreeCamConfig, RenderConfig};

/// Camera contract consumed by the animator and the renderer
pub trait CameraRig {
    /// Replace the eye position and orientation
    fn set_camera_pose(&mut self, position: Vec3, orientation: Quat);

    /// Replace the vertical field of view (degrees)
    fn set_fov(&mut self, fov_degrees: f32);

    /// Perspective projection matrix
    fn projection_matrix(&self) -> Mat4;

    /// World-to-eye matrix
    fn view_matrix(&self) -> Mat4;
}

/// Free camera movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Perspective camera looking down its local -Z axis
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    orientation: Quat,
    world_up: Vec3,
    fov_degrees: f32,
    aspect_ratio: f32,
    near_plane_m: f32,
    far_plane_m: f32,
}

impl Camera {
    /// Create camera at the origin looking down -Z
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            world_up: Vec3::Y,
            fov_degrees: config.fov_degrees,
            aspect_ratio: config.aspect_ratio(),
            near_plane_m: config.near_plane_m,
            far_plane_m: config.far_plane_m,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    /// Current pose, printable as a keyframe literal
    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.orientation)
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Unit vector the camera is looking along
    pub fn view_direction(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Move the eye without changing orientation
    pub fn set_eye_point(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Rotate the camera to look at `target`, keeping `world_up` as up
    pub fn look_at(&mut self, target: Vec3) {
        let direction = target - self.position;
        self.orientation = orientation_towards(direction, self.world_up);
    }

    /// Combined projection * view matrix
    pub fn view_proj_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Translate the camera for one frame of held debug input
    pub fn process_movement(
        &mut self,
        movement: Movement,
        delta_s: f32,
        boost: bool,
        config: &FreeCamConfig,
    ) {
        let speed = config.speed_m_per_s * if boost { config.boost_scale } else { 1.0 };
        let distance = speed * delta_s;

        let right = self.view_direction().cross(self.world_up).normalize_or_zero();
        // Forward stays level with the ground plane
        let forward = self.world_up.cross(right).normalize_or_zero();

        self.position += match movement {
            Movement::Forward => forward * distance,
            Movement::Backward => -forward * distance,
            Movement::Left => -right * distance,
            Movement::Right => right * distance,
            Movement::Up => self.world_up * distance,
            Movement::Down => -self.world_up * distance,
        };
    }

    /// Mouse-look with relative pixel deltas, pitch clamped to ±89°
    pub fn process_mouse(&mut self, delta_x: f32, delta_y: f32, config: &FreeCamConfig) {
        let (yaw, pitch, _roll) = self.orientation.to_euler(EulerRot::YXZ);
        let sensitivity = 0.1 * config.pointer_speed;

        let yaw = yaw.to_degrees() - delta_x * sensitivity;
        let pitch = (pitch.to_degrees() + delta_y * sensitivity).clamp(-89.0, 89.0);

        self.orientation = Quat::from_euler(
            EulerRot::YXZ,
            yaw.to_radians(),
            pitch.to_radians(),
            0.0,
        );
    }
}

impl CameraRig for Camera {
    fn set_camera_pose(&mut self, position: Vec3, orientation: Quat) {
        self.position = position;
        self.orientation = orientation.normalize();
    }

    fn set_fov(&mut self, fov_degrees: f32) {
        self.fov_degrees = fov_degrees;
    }

    fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect_ratio,
            self.near_plane_m,
            self.far_plane_m,
        )
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.orientation.conjugate()) * Mat4::from_translation(-self.position)
    }
}

/// Orientation whose -Z axis points along `direction` with `up` as the up hint
fn orientation_towards(direction: Vec3, up: Vec3) -> Quat {
    let back = if direction.length_squared() == 0.0 {
        Vec3::Z
    } else {
        -direction.normalize()
    };

    let mut up = if up.length_squared() == 0.0 { Vec3::Y } else { up };
    // Degenerate when looking straight along the up hint
    if up.cross(back).length_squared() == 0.0 {
        up = back.cross(Vec3::X);
        if up.length_squared() == 0.0 {
            up = back.cross(Vec3::Z);
        }
    }

    let right = up.cross(back).normalize();
    let true_up = back.cross(right);

    Quat::from_mat3(&Mat3::from_cols(right, true_up, back)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(&RenderConfig::default())
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let mut cam = camera();
        let eye = Vec3::new(3.75, 0.0, 7.96);
        cam.set_camera_pose(eye, Quat::from_rotation_y(0.4));

        let eye_space = cam.view_matrix().transform_point3(eye);
        assert!(eye_space.length() < 1e-5);
    }

    #[test]
    fn test_look_at_points_view_direction_at_target() {
        let mut cam = camera();
        cam.set_eye_point(Vec3::new(3.7500107, 0.0, 7.958207));
        cam.look_at(Vec3::ZERO);

        let expected = (Vec3::ZERO - cam.position()).normalize();
        assert!(cam.view_direction().distance(expected) < 1e-5);

        // Target lands straight ahead in eye space (negative Z, centred)
        let target_eye = cam.view_matrix().transform_point3(Vec3::ZERO);
        assert!(target_eye.x.abs() < 1e-4);
        assert!(target_eye.y.abs() < 1e-4);
        assert!(target_eye.z < 0.0);
    }

    #[test]
    fn test_look_at_straight_down_is_finite() {
        let mut cam = camera();
        cam.set_eye_point(Vec3::new(0.0, 10.0, 0.0));
        cam.look_at(Vec3::ZERO);

        let q = cam.orientation();
        assert!(q.is_finite());
        assert!(cam.view_direction().distance(Vec3::NEG_Y) < 1e-5);
    }

    #[test]
    fn test_projection_tracks_fov() {
        let mut cam = camera();
        let narrow = cam.projection_matrix();
        cam.set_fov(65.0);
        let wide = cam.projection_matrix();

        assert_eq!(cam.fov_degrees(), 65.0);
        // Wider FOV shrinks the Y focal scale
        assert!(wide.y_axis.y < narrow.y_axis.y);
        assert_ne!(cam.view_proj_matrix(), Mat4::ZERO);
    }

    #[test]
    fn test_movement_forward_stays_level() {
        let mut cam = camera();
        cam.set_camera_pose(Vec3::ZERO, Quat::from_rotation_x(-0.5)); // looking down
        cam.process_movement(Movement::Forward, 1.0, false, &FreeCamConfig::default());

        let pos = cam.position();
        assert!(pos.y.abs() < 1e-5);
        assert!((pos.z + 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_movement_boost_and_vertical() {
        let config = FreeCamConfig::default();
        let mut cam = camera();
        cam.process_movement(Movement::Up, 1.0, true, &config);
        assert!((cam.position().y - 7.5).abs() < 1e-4);

        cam.process_movement(Movement::Right, 1.0, false, &config);
        assert!((cam.position().x - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_mouse_pitch_clamped() {
        let mut cam = camera();
        cam.process_mouse(0.0, 10_000.0, &FreeCamConfig::default());

        let (_, pitch, _) = cam.orientation().to_euler(EulerRot::YXZ);
        assert!(pitch.to_degrees() <= 89.01);
        assert!(cam.view_direction().y > 0.99);
    }
}
