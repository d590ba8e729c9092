//! WAV segment writing.
//!
//! Each exported segment becomes `{segment_id}.wav` in the export directory,
//! keeping the sample rate of the decoded source. Files from input
//! subdirectories land in the same subdirectories (`spk1/a_1.00_2.00.wav`).

use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::debug;

use crate::audio::DecodedAudio;
use crate::error::{Error, Result};
use crate::export::SegmentExporter;
use crate::segment::Segment;

/// Writes segment audio as 16-bit mono WAV files.
#[derive(Debug, Clone)]
pub struct WavSegmentExporter {
    output_dir: PathBuf,
}

impl WavSegmentExporter {
    /// Create an exporter writing into `output_dir`.
    #[must_use]
    pub const fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Directory the clips are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path a segment would be exported to.
    pub fn path_for(&self, segment: &Segment) -> PathBuf {
        let id = segment.segment_id();
        let (dirs, base) = id.rsplit_once('/').unwrap_or(("", id.as_str()));

        let mut path = self.output_dir.clone();
        for dir in dirs.split('/').filter(|d| !d.is_empty()) {
            path.push(sanitize_filename(dir));
        }
        path.push(format!("{}.wav", sanitize_filename(base)));
        path
    }
}

impl SegmentExporter for WavSegmentExporter {
    fn export(&self, audio: &DecodedAudio, segment: &Segment) -> Result<PathBuf> {
        let samples = audio
            .slice(segment.start, segment.end)
            .ok_or_else(|| Error::SliceExport {
                segment_id: segment.segment_id(),
                reason: format!(
                    "range {:.3}-{:.3}s is outside the {:.3}s of decoded audio",
                    segment.start, segment.end, audio.duration_secs
                ),
            })?;

        let path = self.path_for(segment);
        let dir = path.parent().unwrap_or(self.output_dir.as_path());
        fs::create_dir_all(dir).map_err(|e| Error::OutputDirCreateFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

        write_wav_file(&path, samples, audio.sample_rate)?;
        debug!("Exported {} samples to {}", samples.len(), path.display());

        Ok(path)
    }
}

/// Replace characters that are invalid in file names on common platforms.
fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect();

    sanitized.replace("..", "__")
}

/// Write mono f32 samples as 16-bit PCM.
fn write_wav_file(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let wav_error = |e| Error::WavWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let mut writer = WavWriter::create(path, spec).map_err(wav_error)?;
    for &sample in samples {
        #[allow(clippy::cast_possible_truncation)]
        let value = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer.write_sample(value).map_err(wav_error)?;
    }
    writer.finalize().map_err(wav_error)?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn audio(seconds: usize, sample_rate: u32) -> DecodedAudio {
        let samples = vec![0.25_f32; seconds * sample_rate as usize];
        #[allow(clippy::cast_precision_loss)]
        let duration_secs = samples.len() as f64 / f64::from(sample_rate);
        DecodedAudio {
            samples,
            sample_rate,
            duration_secs,
        }
    }

    #[test]
    fn test_export_writes_named_clip() {
        let dir = TempDir::new().unwrap();
        let exporter = WavSegmentExporter::new(dir.path().join("clips"));
        let segment = Segment::new("talk", 1.0, 2.5);

        let path = exporter.export(&audio(4, 8000), &segment).unwrap();
        assert_eq!(path.file_name().unwrap(), "talk_1.00_2.50.wav");

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 12_000);
    }

    #[test]
    fn test_same_file_name_in_two_subdirectories_exports_apart() {
        let dir = TempDir::new().unwrap();
        let exporter = WavSegmentExporter::new(dir.path().to_path_buf());
        let first = Segment::new("spk1/a", 1.0, 2.0);
        let second = Segment::new("spk2/a", 1.0, 2.0);

        let first_path = exporter.export(&audio(3, 8000), &first).unwrap();
        let second_path = exporter.export(&audio(3, 8000), &second).unwrap();

        assert_eq!(first_path, dir.path().join("spk1").join("a_1.00_2.00.wav"));
        assert_eq!(second_path, dir.path().join("spk2").join("a_1.00_2.00.wav"));
        assert!(first_path.exists() && second_path.exists());
    }

    #[test]
    fn test_segment_id_cannot_leave_export_dir() {
        let exporter = WavSegmentExporter::new(PathBuf::from("clips"));
        let path = exporter.path_for(&Segment::new("../up/x", 0.0, 1.0));
        assert_eq!(path, Path::new("clips").join("__").join("up").join("x_0.00_1.00.wav"));
    }

    #[test]
    fn test_export_outside_audio_fails() {
        let dir = TempDir::new().unwrap();
        let exporter = WavSegmentExporter::new(dir.path().to_path_buf());
        let segment = Segment::new("talk", 5.0, 6.0);

        let err = exporter.export(&audio(2, 8000), &segment).unwrap_err();
        assert!(matches!(err, Error::SliceExport { ref segment_id, .. } if segment_id == "talk_5.00_6.00"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a/b:c*d"), "a_b_c_d");
        assert_eq!(sanitize_filename("../etc"), "___etc");
        assert_eq!(sanitize_filename("rec_1.00_2.00"), "rec_1.00_2.00");
    }
}
