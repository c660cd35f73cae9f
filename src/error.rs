//! Load-time and setup-time failures.
//!
//! Everything here is fatal for a session: the caller reports it and exits.
//! The real-time mixing path has no error states and never produces these.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while loading a song or preparing its audio stream
#[derive(Debug, Error)]
pub enum SongError {
    /// Audio asset missing, unreadable, or not decodable PCM
    #[error("failed to decode audio {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// Spectrum dataset missing, undecodable, or structurally invalid
    #[error("invalid spectrum dataset {}: {reason}", path.display())]
    Dataset { path: PathBuf, reason: String },

    /// Output stream could not be created for the negotiated format
    #[error("audio setup failed: {0}")]
    AudioSetup(String),

    /// Filesystem failure while writing an asset
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SongError {
    pub(crate) fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn dataset(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Dataset {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
