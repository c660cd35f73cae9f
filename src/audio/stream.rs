//! Pre-converted song bytes behind a lock-free SPSC ring.

use log::debug;
use ringbuf::{
    traits::{Consumer, Observer, Producer, Split},
    HeapCons, HeapRb,
};

use super::convert::convert;
use super::decode::DecodedAudio;
use super::format::PcmFormat;
use crate::error::SongError;

/// Whole song in device format, drained by the output callback
pub struct ConversionStream {
    consumer: HeapCons<u8>,
    format: PcmFormat,
}

impl ConversionStream {
    /// Convert all of `audio` to `format` and push it into the ring.
    ///
    /// The producer is dropped once everything is pushed, so the stream is
    /// flushed and only ever shrinks afterwards.
    pub fn new(audio: &DecodedAudio, format: PcmFormat) -> Result<Self, SongError> {
        let bytes = convert(audio, format)?;

        let ring = HeapRb::<u8>::new(bytes.len().max(1));
        let (mut producer, consumer) = ring.split();
        let pushed = producer.push_slice(&bytes);
        if pushed != bytes.len() {
            return Err(SongError::AudioSetup(format!(
                "conversion stream accepted {} of {} bytes",
                pushed,
                bytes.len()
            )));
        }
        drop(producer);

        debug!(
            "Conversion stream ready: {} bytes ({} -> {}, resampled: {})",
            bytes.len(),
            audio.format(),
            format,
            audio.sample_rate != format.sample_rate
        );

        Ok(Self { consumer, format })
    }

    /// Device format of the bytes in the stream
    pub fn format(&self) -> PcmFormat {
        self.format
    }

    /// Bytes left to deliver
    pub fn available(&self) -> usize {
        self.consumer.occupied_len()
    }

    /// Pop up to `out.len()` bytes, returns the count copied
    pub fn get(&mut self, out: &mut [u8]) -> usize {
        self.consumer.pop_slice(out)
    }
}
