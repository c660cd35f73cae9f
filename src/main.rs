//! Barwave - spectrum bars that dance to a song while the camera tours them
//!
//! Headless shell: loads a song, starts playback and runs the per-frame
//! update at a fixed rate until the song ends.

mod cli;

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use glam::Vec3;
use log::info;

use barwave::animation::{default_transitions, CameraAnimator};
use barwave::audio::{decode_audio, OutputDevice, PcmFormat};
use barwave::params::{AnalysisConfig, BarLayout, RenderConfig};
use barwave::session::VisSession;
use barwave::song::{song_dir, SongData, AUDIO_FILE, SPECTRUM_FILE};
use barwave::spectrum::analysis::analyse;
use cli::Args;

/// Seconds between progress log lines
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();

    if args.analyse {
        analyse_song(&args)
    } else {
        play_song(&args)
    }
}

/// Write `spectrum.bin` next to the song's audio
fn analyse_song(args: &Args) -> Result<()> {
    let dir = song_dir(&args.data_dir, &args.song_name);
    let audio_path = dir.join(AUDIO_FILE);
    let spectrum_path = dir.join(SPECTRUM_FILE);

    let audio = decode_audio(&audio_path).context("Failed to decode song audio")?;
    let dataset = analyse(&audio, &AnalysisConfig::default())
        .map_err(|e| anyhow!("Spectrum analysis failed: {}", e))?;
    dataset
        .save(&spectrum_path)
        .context("Failed to write spectrum dataset")?;

    info!(
        "Wrote {} ({} blocks, {:.1}s)",
        spectrum_path.display(),
        dataset.num_blocks(),
        dataset.duration_s()
    );
    Ok(())
}

fn play_song(args: &Args) -> Result<()> {
    let render_config = RenderConfig::default();
    let playback = args.playback_config();

    let mut song = SongData::open(&args.data_dir, &args.song_name)
        .with_context(|| format!("Failed to load song '{}'", args.song_name))?;

    let native = song
        .requested_format()
        .context("Song audio already handed to a stream")?;
    let requested = PcmFormat {
        channels: playback.channels,
        ..native
    };

    let device = OutputDevice::open(requested, &playback).context("Failed to open audio device")?;
    let mixer = song
        .setup_audio(device.format(), playback.muted)
        .context("Failed to prepare song audio")?;

    let mut animator = CameraAnimator::new(args.animator_config());
    animator.add_transitions(default_transitions());

    let mut session = VisSession::new(song, animator, &render_config, BarLayout::default());
    if args.free_cam {
        session.toggle_free_cam();
    }
    info!(
        "{} bars centred at {}, camera {}",
        session.bars().bars().len(),
        session.bars().center(),
        if session.is_free_cam() { "free" } else { "animated" }
    );

    let output = device.start(mixer).context("Failed to start playback")?;

    info!(
        "Playing '{}' ({:.1}s, {}), press Ctrl+C to quit",
        session.song().name(),
        session.song().spectrum().duration_s(),
        output.format()
    );

    run_frames(&mut session, args.fps);
    Ok(())
}

/// Fixed-rate frame loop, returns at end of song
fn run_frames(session: &mut VisSession, fps: u32) {
    let frame_time = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
    let num_blocks = session.song().spectrum().num_blocks();

    let mut last_frame = Instant::now();
    let mut last_report = last_frame;

    loop {
        let frame_start = Instant::now();
        let delta_s = frame_start.duration_since(last_frame).as_secs_f32();
        last_frame = frame_start;

        let info = session.frame(delta_s);

        if frame_start.duration_since(last_report) >= REPORT_INTERVAL {
            last_report = frame_start;
            // Top of the tallest bar in world space
            let peak_m = session
                .bars()
                .model_matrices()
                .map(|model| model.transform_point3(Vec3::Y).y)
                .fold(0.0, f32::max);
            info!(
                "Block {}/{} energy {:.2} peak {:.2}m {}",
                info.block_index + 1,
                num_blocks,
                info.spectral_energy_ratio,
                peak_m,
                info.pose
            );
        }

        if info.finished {
            info!("End of song");
            break;
        }

        let spent = frame_start.elapsed();
        if spent < frame_time {
            thread::sleep(frame_time - spent);
        }
    }
}
