//! PCM layouts exchanged between the decoder and the output device.

use std::fmt;

/// Sample encodings the conversion stream can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    I16,
    I32,
    F32,
}

impl SampleFormat {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::I16 => 2,
            SampleFormat::I32 | SampleFormat::F32 => 4,
        }
    }

    /// Map a device sample format, `None` when unsupported
    pub fn from_cpal(format: cpal::SampleFormat) -> Option<Self> {
        match format {
            cpal::SampleFormat::I16 => Some(SampleFormat::I16),
            cpal::SampleFormat::I32 => Some(SampleFormat::I32),
            cpal::SampleFormat::F32 => Some(SampleFormat::F32),
            _ => None,
        }
    }

    pub fn to_cpal(self) -> cpal::SampleFormat {
        match self {
            SampleFormat::I16 => cpal::SampleFormat::I16,
            SampleFormat::I32 => cpal::SampleFormat::I32,
            SampleFormat::F32 => cpal::SampleFormat::F32,
        }
    }
}

/// Interleaved PCM layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_format: SampleFormat,
    pub channels: u16,
    pub sample_rate: u32,
}

impl PcmFormat {
    /// Bytes in one frame (one sample for every channel)
    pub fn bytes_per_frame(&self) -> usize {
        self.sample_format.bytes_per_sample() * self.channels as usize
    }
}

impl fmt::Display for PcmFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} x{} @ {}Hz",
            self.sample_format, self.channels, self.sample_rate
        )
    }
}
