//! Per-file processing outcome.

use crate::error::Error;
use crate::pipeline::coordinator::InputFile;
use crate::segment::Segment;
use std::path::PathBuf;

/// Classification of a processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// At least one speech segment was found.
    Processed,
    /// Audio decoded fine but no segment survived filtering.
    NoSpeech,
    /// Decoding, detection or segmentation failed.
    Error {
        /// Error description.
        message: String,
    },
}

impl FileStatus {
    /// Stable label used in logs and status lists.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::NoSpeech => "warning_no_speech",
            Self::Error { .. } => "error",
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error { message } => write!(f, "error: {message}"),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// A segment whose audio could not be exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFailure {
    /// Identifier of the segment.
    pub segment_id: String,
    /// Error description.
    pub reason: String,
}

/// Everything known about one input file after processing.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// Path of the audio file.
    pub path: PathBuf,
    /// Name relative to the input directory, as written to tables and lists.
    pub name: String,
    /// File identifier (name without extension) used in segment ids.
    pub file_id: String,
    /// Classification.
    pub status: FileStatus,
    /// File duration in seconds, when it could be determined.
    pub total_duration: Option<f64>,
    /// Speech segments, sorted by start. Empty unless `Processed`.
    pub segments: Vec<Segment>,
    /// Segments whose audio export failed.
    pub export_failures: Vec<ExportFailure>,
}

impl FileOutcome {
    /// Outcome of a file that was segmented successfully.
    ///
    /// Classified as `NoSpeech` when `segments` is empty.
    pub fn segmented(input: &InputFile, total_duration: f64, segments: Vec<Segment>) -> Self {
        let status = if segments.is_empty() {
            FileStatus::NoSpeech
        } else {
            FileStatus::Processed
        };
        Self::new(input, status, Some(total_duration), segments)
    }

    /// Outcome of a file that failed. `total_duration` is `None` when the
    /// failure happened before the duration was known.
    pub fn failed(input: &InputFile, total_duration: Option<f64>, error: &Error) -> Self {
        Self::failed_with_message(input, total_duration, error.to_string())
    }

    /// Failed outcome carrying a message recorded by an earlier run.
    pub fn failed_with_message(
        input: &InputFile,
        total_duration: Option<f64>,
        message: String,
    ) -> Self {
        Self::new(
            input,
            FileStatus::Error { message },
            total_duration,
            Vec::new(),
        )
    }

    fn new(
        input: &InputFile,
        status: FileStatus,
        total_duration: Option<f64>,
        segments: Vec<Segment>,
    ) -> Self {
        Self {
            path: input.path.clone(),
            name: input.name.clone(),
            file_id: input.file_id(),
            status,
            total_duration,
            segments,
            export_failures: Vec::new(),
        }
    }

    /// Sum of segment durations in seconds.
    pub fn speech_duration(&self) -> f64 {
        self.segments.iter().map(Segment::duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn input(path: &str) -> InputFile {
        InputFile::from_path(Path::new(path))
    }

    #[test]
    fn test_segmented_without_segments_is_no_speech() {
        let outcome = FileOutcome::segmented(&input("/a/quiet.wav"), 4.0, vec![]);
        assert_eq!(outcome.status, FileStatus::NoSpeech);
        assert_eq!(outcome.file_id, "quiet");
        assert_eq!(outcome.name, "quiet.wav");
    }

    #[test]
    fn test_nested_input_keeps_relative_name() {
        let nested = InputFile::under_root(Path::new("/c"), Path::new("/c/spk2/a.wav"));
        let outcome = FileOutcome::segmented(&nested, 4.0, vec![]);
        assert_eq!(outcome.name, "spk2/a.wav");
        assert_eq!(outcome.file_id, "spk2/a");
    }

    #[test]
    fn test_failed_outcome_keeps_message() {
        let err = Error::EmptyCorpus;
        let outcome = FileOutcome::failed(&input("x.wav"), None, &err);
        assert_eq!(outcome.status.label(), "error");
        assert!(outcome.status.to_string().contains("no audio files"));
        assert!(outcome.total_duration.is_none());
    }

    #[test]
    fn test_speech_duration() {
        let outcome = FileOutcome::segmented(
            &input("talk.wav"),
            10.0,
            vec![Segment::new("talk", 0.0, 1.5), Segment::new("talk", 3.0, 4.0)],
        );
        assert_eq!(outcome.status, FileStatus::Processed);
        assert!((outcome.speech_duration() - 2.5).abs() < 1e-12);
    }
}
