//! Speech activity detectors.
//!
//! A detector turns decoded audio into an [`ActivityTimeline`]. The segment
//! builder never looks at samples directly, so any model that can emit
//! per-frame probabilities can be plugged in behind [`SpeechDetector`].

mod energy;
mod sidecar;

pub use energy::EnergyDetector;
pub use sidecar::{SidecarDetector, read_timeline_file, sidecar_path_for};

use crate::audio::DecodedAudio;
use crate::config::{DetectorConfig, DetectorKind};
use crate::error::Result;
use crate::segment::ActivityTimeline;
use std::path::Path;

/// Produces a per-frame speech activity timeline for one file.
pub trait SpeechDetector: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Detect speech activity in decoded audio.
    ///
    /// `source` is the path the audio was decoded from.
    fn detect(&self, source: &Path, audio: &DecodedAudio) -> Result<ActivityTimeline>;
}

/// Build the detector selected in the configuration.
pub fn build_detector(config: &DetectorConfig) -> Box<dyn SpeechDetector> {
    match config.kind {
        DetectorKind::Energy => Box::new(EnergyDetector::from_config(config)),
        DetectorKind::Sidecar => Box::new(SidecarDetector),
    }
}
