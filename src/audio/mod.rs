//! Song audio: decode, format conversion, real-time mixing, device output.
//!
//! The whole song is decoded and converted up front. The output callback
//! only copies pre-converted bytes out of a lock-free ring and bumps an
//! atomic playback position the render loop reads once per frame.

mod convert;
mod decode;
mod format;
mod output;
mod stream;
mod tracker;

// Re-export public types
pub use decode::{decode_audio, DecodedAudio};
pub use format::{PcmFormat, SampleFormat};
pub use output::{AudioOutput, OutputDevice};
pub use stream::ConversionStream;
pub use tracker::{AudioMixer, PlaybackState};
