//! Barwave library - audio-reactive spectrum bars with an animated camera

pub mod animation;
pub mod audio;
pub mod bars;
pub mod camera;
pub mod error;
pub mod noise;
pub mod params;
pub mod session;
pub mod song;
pub mod spectrum;
pub mod util;

pub use error::SongError;
