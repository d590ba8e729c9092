//! Export of per-segment audio.

mod wav;

pub use wav::WavSegmentExporter;

use crate::audio::DecodedAudio;
use crate::error::Result;
use crate::segment::Segment;
use std::path::PathBuf;

/// Writes the audio covered by a segment somewhere durable.
pub trait SegmentExporter: Send + Sync {
    /// Export one segment of `audio` and return the written path.
    ///
    /// # Errors
    ///
    /// Returns `Error::SliceExport` when the segment lies outside the audio,
    /// or the underlying write error.
    fn export(&self, audio: &DecodedAudio, segment: &Segment) -> Result<PathBuf>;
}
