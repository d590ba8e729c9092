//! Energy-based speech activity detection.
//!
//! Computes the RMS level of fixed-length frames and maps it linearly from a
//! floor level (probability 0) to a ceiling level (probability 1) in dBFS.
//! Works without any model files, which makes it the default detector.

use crate::audio::DecodedAudio;
use crate::config::DetectorConfig;
use crate::detect::SpeechDetector;
use crate::error::{Error, Result};
use crate::segment::ActivityTimeline;
use std::path::Path;

/// RMS-level detector.
#[derive(Debug, Clone)]
pub struct EnergyDetector {
    frame_ms: u32,
    floor_db: f32,
    ceiling_db: f32,
}

impl EnergyDetector {
    /// Create a detector with explicit parameters.
    pub const fn new(frame_ms: u32, floor_db: f32, ceiling_db: f32) -> Self {
        Self {
            frame_ms,
            floor_db,
            ceiling_db,
        }
    }

    /// Create a detector from configuration.
    pub const fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.frame_ms, config.floor_db, config.ceiling_db)
    }

    /// Map an RMS value to a speech probability.
    fn probability(&self, rms: f32) -> f32 {
        if rms <= 0.0 {
            return 0.0;
        }
        let db = 20.0 * rms.log10();
        ((db - self.floor_db) / (self.ceiling_db - self.floor_db)).clamp(0.0, 1.0)
    }
}

impl Default for EnergyDetector {
    fn default() -> Self {
        Self::from_config(&DetectorConfig::default())
    }
}

impl SpeechDetector for EnergyDetector {
    fn name(&self) -> &'static str {
        "energy"
    }

    fn detect(&self, source: &Path, audio: &DecodedAudio) -> Result<ActivityTimeline> {
        if audio.sample_rate == 0 {
            return Err(Error::Detection {
                path: source.to_path_buf(),
                reason: "sample rate is zero".to_string(),
            });
        }

        let frame_len = (u64::from(audio.sample_rate) * u64::from(self.frame_ms) / 1000).max(1);
        #[allow(clippy::cast_possible_truncation)]
        let frame_len = frame_len as usize;
        #[allow(clippy::cast_precision_loss)]
        let frame_secs = frame_len as f64 / f64::from(audio.sample_rate);

        let probabilities: Vec<f32> = audio
            .samples
            .chunks(frame_len)
            .map(|frame| self.probability(rms(frame)))
            .collect();

        Ok(ActivityTimeline::from_probabilities(
            &probabilities,
            frame_secs,
            audio.duration_secs,
        ))
    }
}

/// Root mean square of a frame.
fn rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = frame.iter().map(|s| s * s).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = sum_squares / frame.len() as f32;
    mean.sqrt()
}
