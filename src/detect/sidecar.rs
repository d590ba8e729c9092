//! Precomputed activity timelines.
//!
//! Lets an external model (run separately, on whatever hardware it needs)
//! hand its per-frame output to corpus-vad. For `talk.wav` the timeline is
//! read from `talk.vad.csv` next to it:
//!
//! ```text
//! time,probability
//! 0.00,0.02
//! 0.03,0.91
//! ```

use crate::audio::DecodedAudio;
use crate::constants::SIDECAR_SUFFIX;
use crate::detect::SpeechDetector;
use crate::error::{Error, Result};
use crate::segment::{ActivityFrame, ActivityTimeline};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct FrameRecord {
    time: f64,
    probability: f32,
}

/// Detector reading `<stem>.vad.csv` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarDetector;

impl SpeechDetector for SidecarDetector {
    fn name(&self) -> &'static str {
        "sidecar"
    }

    fn detect(&self, source: &Path, audio: &DecodedAudio) -> Result<ActivityTimeline> {
        let path = sidecar_path_for(source);
        if !path.exists() {
            return Err(Error::TimelineNotFound { path });
        }
        read_timeline_file(&path, audio.duration_secs)
    }
}

/// Path of the timeline file belonging to an audio file.
pub fn sidecar_path_for(audio_path: &Path) -> PathBuf {
    let stem = audio_path.file_stem().map_or_else(
        || std::borrow::Cow::Borrowed("output"),
        |s| s.to_string_lossy(),
    );
    audio_path.with_file_name(format!("{stem}{SIDECAR_SUFFIX}"))
}

/// Read a `time,probability` CSV into a timeline of the given duration.
///
/// Ordering is not checked here; the segment builder rejects unsorted input.
pub fn read_timeline_file(path: &Path, duration: f64) -> Result<ActivityTimeline> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::Detection {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut frames = Vec::new();
    for (line_num, result) in reader.deserialize::<FrameRecord>().enumerate() {
        let record = result.map_err(|e| Error::Detection {
            path: path.to_path_buf(),
            reason: format!("line {}: {e}", line_num + 2),
        })?;
        frames.push(ActivityFrame::new(record.time, record.probability));
    }

    Ok(ActivityTimeline::new(frames, duration))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn silent_audio(duration_secs: f64) -> DecodedAudio {
        DecodedAudio {
            samples: Vec::new(),
            sample_rate: 16_000,
            duration_secs,
        }
    }

    #[test]
    fn test_sidecar_path_for() {
        let path = sidecar_path_for(Path::new("/data/talk.wav"));
        assert_eq!(path, PathBuf::from("/data/talk.vad.csv"));
    }

    #[test]
    fn test_reads_sidecar_timeline() {
        let dir = TempDir::new().unwrap();
        let audio_path = dir.path().join("talk.wav");
        let mut file = std::fs::File::create(dir.path().join("talk.vad.csv")).unwrap();
        writeln!(file, "time,probability").unwrap();
        writeln!(file, "0.0,0.1").unwrap();
        writeln!(file, "0.5,0.9").unwrap();

        let timeline = SidecarDetector
            .detect(&audio_path, &silent_audio(2.0))
            .unwrap();
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.frames()[1].probability, 0.9);
        assert_eq!(timeline.duration(), 2.0);
    }

    #[test]
    fn test_missing_sidecar() {
        let dir = TempDir::new().unwrap();
        let result = SidecarDetector.detect(&dir.path().join("none.wav"), &silent_audio(1.0));
        assert!(matches!(result, Err(Error::TimelineNotFound { .. })));
    }

    #[test]
    fn test_malformed_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.vad.csv");
        std::fs::write(&path, "time,probability\nabc,0.5\n").unwrap();
        assert!(matches!(
            read_timeline_file(&path, 1.0),
            Err(Error::Detection { .. })
        ));
    }
}
