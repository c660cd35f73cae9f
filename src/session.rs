//! Visualiser session: everything one running song needs, in one place.

use glam::Vec3;
use log::info;

use crate::animation::{CameraAnimator, CameraPose};
use crate::bars::BarField;
use crate::camera::Camera;
use crate::params::{BarLayout, RenderConfig};
use crate::song::SongData;

/// Eye point the camera starts at before the first animated frame
const START_EYE: Vec3 = Vec3::new(3.750_010_7, 0.0, 7.958_207);

/// Snapshot of one rendered frame
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo {
    /// Audible spectrum block, clamped to the dataset
    pub block_index: usize,
    /// Block energy relative to the loudest block (0-1)
    pub spectral_energy_ratio: f32,
    /// Camera pose after this frame
    pub pose: CameraPose,
    /// Animator moved the camera this frame
    pub animated: bool,
    /// Playback has reached the end of the song
    pub finished: bool,
}

/// Song, camera, animator and bars driven once per frame
pub struct VisSession {
    song: SongData,
    camera: Camera,
    animator: CameraAnimator,
    bars: BarField,
    free_cam: bool,
}

impl VisSession {
    pub fn new(
        song: SongData,
        animator: CameraAnimator,
        render: &RenderConfig,
        layout: BarLayout,
    ) -> Self {
        let mut camera = Camera::new(render);
        camera.set_eye_point(START_EYE);
        camera.look_at(Vec3::ZERO);

        let bars = BarField::new(song.spectrum().num_bars as usize, layout);

        Self {
            song,
            camera,
            animator,
            bars,
            free_cam: false,
        }
    }

    /// Advance one frame by `delta_s` seconds.
    ///
    /// The playback position is read once; bars and camera both use that
    /// snapshot even if the audio thread moves on meanwhile.
    pub fn frame(&mut self, delta_s: f32) -> FrameInfo {
        let spectrum = self.song.spectrum();
        let block_index = spectrum.clamp_block_index(self.song.current_block_index());
        let spectral_energy_ratio = spectrum.normalized_energy(block_index);

        self.bars.update(spectrum.block(block_index));

        let animated = if self.free_cam {
            false
        } else {
            self.animator
                .update(delta_s, spectral_energy_ratio, &mut self.camera)
                .is_some()
        };

        FrameInfo {
            block_index,
            spectral_energy_ratio,
            pose: self.camera.pose(),
            animated,
            finished: self.song.is_finished(),
        }
    }

    /// Toggle manual camera control, returns the new state
    pub fn toggle_free_cam(&mut self) -> bool {
        self.free_cam = !self.free_cam;
        info!("Toggle freecam ({})", if self.free_cam { "on" } else { "off" });
        self.free_cam
    }

    pub fn is_free_cam(&self) -> bool {
        self.free_cam
    }

    /// Jump to the next camera transition
    pub fn force_advance(&mut self) {
        self.animator.force_advance_transition();
    }

    /// Log and return the current camera pose as a keyframe literal
    pub fn capture_pose(&self) -> CameraPose {
        let pose = self.camera.pose();
        info!("{}", pose);
        pose
    }

    pub fn song(&self) -> &SongData {
        &self.song
    }

    pub fn song_mut(&mut self) -> &mut SongData {
        &mut self.song
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn animator(&self) -> &CameraAnimator {
        &self.animator
    }

    pub fn bars(&self) -> &BarField {
        &self.bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::CameraTransition;
    use crate::audio::DecodedAudio;
    use crate::params::AnimatorConfig;
    use crate::spectrum::tests::sample_dataset;
    use glam::Quat;

    fn session() -> VisSession {
        let pcm = DecodedAudio {
            samples: vec![3; 2048 * 2],
            channels: 2,
            sample_rate: 44_100,
        };
        let song = SongData::from_parts("test", pcm, sample_dataset());

        let mut animator = CameraAnimator::new(AnimatorConfig::steady());
        for end_x in [10.0, -10.0] {
            animator.add_transition(CameraTransition::new(
                CameraPose::new(Vec3::ZERO, Quat::IDENTITY),
                CameraPose::new(Vec3::new(end_x, 0.0, 0.0), Quat::IDENTITY),
                2.0,
            ));
        }

        VisSession::new(song, animator, &RenderConfig::default(), BarLayout::default())
    }

    #[test]
    fn test_initial_camera_looks_at_origin() {
        let session = session();
        let to_origin = (-session.camera().position()).normalize();
        assert!(session.camera().view_direction().distance(to_origin) < 1e-5);
        assert_eq!(session.bars().bars().len(), 4);
    }

    #[test]
    fn test_frame_follows_playback() {
        let mut session = session();
        let format = session.song().requested_format().unwrap();
        let mut mixer = session.song_mut().setup_audio(format, true).unwrap();

        let info = session.frame(0.0);
        assert_eq!(info.block_index, 0);
        assert_eq!(info.spectral_energy_ratio, 0.25);

        // 512 frames of stereo i32
        let mut out = vec![0u8; 4096];
        mixer.mix_audio(&mut out);

        let info = session.frame(0.0);
        assert_eq!(info.block_index, 1);
        assert_eq!(info.spectral_energy_ratio, 1.0);
        let expected = 0.1 * (1.0 + 49.0 * 40.0 / 255.0);
        assert!((session.bars().bars()[3].height() - expected).abs() < 1e-5);
        assert!(!info.finished);
    }

    #[test]
    fn test_index_past_end_is_clamped() {
        let mut session = session();
        let format = session.song().requested_format().unwrap();
        let mut mixer = session.song_mut().setup_audio(format, true).unwrap();

        let mut out = vec![0u8; 4096];
        while mixer.mix_audio(&mut out) > 0 {}

        // 2048 frames / 512 = block 4, past the last block
        let info = session.frame(0.0);
        assert_eq!(info.block_index, 2);
        assert!(info.finished);
    }

    #[test]
    fn test_animator_drives_camera() {
        let mut session = session();
        session.frame(1.0);
        let info = session.frame(1.0);

        assert!(info.animated);
        assert!((info.pose.position.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_free_cam_stops_animation() {
        let mut session = session();
        session.frame(1.0);
        assert!(session.toggle_free_cam());
        assert!(session.is_free_cam());

        let before = session.camera().position();
        let info = session.frame(1.0);
        assert!(!info.animated);
        assert_eq!(session.camera().position(), before);

        assert!(!session.toggle_free_cam());
        assert!(session.frame(1.0).animated);
    }

    #[test]
    fn test_force_advance_switches_transition() {
        let mut session = session();
        session.frame(0.5);
        assert_eq!(session.animator().current_index(), Some(0));

        session.force_advance();
        session.frame(1.0);
        assert_eq!(session.animator().current_index(), Some(1));

        let info = session.frame(1.0);
        assert!((info.pose.position.x + 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_capture_pose_matches_camera() {
        let session = session();
        let pose = session.capture_pose();
        assert_eq!(pose.position, session.camera().position());
        assert!(pose
            .to_string()
            .starts_with("CameraPose::new(Vec3::new(3.7500, 0.0000, 7.9582)"));
    }
}
