//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use barwave::params::{AnimatorConfig, PlaybackConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "barwave")]
#[command(about = "Audio-reactive spectrum bar visualiser", long_about = None)]
pub struct Args {
    /// Data directory containing `songs/<name>/`
    pub data_dir: PathBuf,

    /// Song to play (directory name under `songs/`)
    pub song_name: String,

    /// Generate `spectrum.bin` from `audio.flac` and exit
    #[arg(long)]
    pub analyse: bool,

    /// Play silently (position tracking still runs)
    #[arg(long)]
    pub mute: bool,

    /// Disable energy-driven camera shake
    #[arg(long)]
    pub no_shake: bool,

    /// Start with the camera animation paused
    #[arg(long)]
    pub free_cam: bool,

    /// Frame loop rate (frames per second)
    #[arg(long, value_name = "FPS", default_value_t = 60)]
    pub fps: u32,
}

impl Args {
    pub fn animator_config(&self) -> AnimatorConfig {
        if self.no_shake {
            AnimatorConfig::steady()
        } else {
            AnimatorConfig::default()
        }
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            muted: self.mute,
            ..PlaybackConfig::default()
        }
    }
}
