//! Error types for corpus-vad.

/// Result type alias for corpus-vad operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for corpus-vad.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// No audio files were found, so there is nothing to aggregate.
    #[error("no audio files found in the provided paths")]
    EmptyCorpus,

    /// Two input files would be reported under the same name.
    #[error("'{first}' and '{second}' would both be reported as '{name}'")]
    DuplicateInput {
        /// Shared file name or file identifier.
        name: String,
        /// First file with that name.
        first: std::path::PathBuf,
        /// Second file with that name.
        second: std::path::PathBuf,
    },

    /// Failed to open audio file.
    #[error("failed to open audio file '{path}'")]
    AudioOpen {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to decode audio.
    #[error("failed to decode audio from '{path}'")]
    AudioDecode {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No audio tracks found.
    #[error("no audio tracks found in '{path}'")]
    NoAudioTracks {
        /// Path to the audio file.
        path: std::path::PathBuf,
    },

    /// The detector produced a timeline that cannot be segmented.
    #[error("invalid activity timeline: {reason}")]
    InvalidTimeline {
        /// Description of the malformation.
        reason: String,
    },

    /// The speech detector failed on a file.
    #[error("speech detection failed for '{path}': {reason}")]
    Detection {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// Precomputed timeline file is missing.
    #[error("activity timeline file not found: {path}")]
    TimelineNotFound {
        /// Expected path of the timeline file.
        path: std::path::PathBuf,
    },

    /// Exporting the audio slice of one segment failed.
    #[error("failed to export segment '{segment_id}': {reason}")]
    SliceExport {
        /// Identifier of the segment.
        segment_id: String,
        /// Description of the failure.
        reason: String,
    },

    /// Failed to write WAV file.
    #[error("failed to write WAV file '{path}'")]
    WavWriteFailed {
        /// Path to the WAV file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: hound::Error,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        /// Path to the output directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to read an exclusion list.
    #[error("failed to read exclusion list '{path}'")]
    ExclusionListRead {
        /// Path to the exclusion list.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to open or parse a segment table.
    #[error("failed to parse segment table '{path}'")]
    SegmentTableParse {
        /// Path to the segment table.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Segment table content is inconsistent.
    #[error("invalid segment table: {message}")]
    InvalidSegmentTable {
        /// Description of the inconsistency.
        message: String,
    },

    /// Failed to write a CSV file.
    #[error("failed to write CSV file '{path}'")]
    CsvWrite {
        /// Path to the CSV file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },

    /// Failed to create Parquet file.
    #[error("failed to create Parquet file '{path}'")]
    ParquetFileCreate {
        /// Path to the Parquet file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write Parquet data.
    #[error("{context}")]
    ParquetWrite {
        /// What was being written.
        context: String,
        /// Underlying Parquet error.
        #[source]
        source: parquet::errors::ParquetError,
    },

    /// Failed to build an Arrow record batch.
    #[error("failed to build Arrow record batch")]
    ArrowBatch {
        /// Underlying Arrow error.
        #[source]
        source: arrow::error::ArrowError,
    },

    /// Failed to write JSON output file.
    #[error("failed to write JSON output file '{path}'")]
    JsonWrite {
        /// Path to the JSON file.
        path: std::path::PathBuf,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The run was interrupted before every file was processed.
    #[error("cancelled after {completed} of {total} file(s)")]
    Cancelled {
        /// Files whose outcome was recorded.
        completed: usize,
        /// Files discovered.
        total: usize,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Whether the container opened but its audio data failed to decode.
    ///
    /// Open failures and files without an audio track are not decode errors.
    pub const fn is_decode_error(&self) -> bool {
        matches!(self, Self::AudioDecode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_decode_errors_are_classified() {
        let err = Error::AudioDecode {
            path: PathBuf::from("a.wav"),
            source: "bad packet".into(),
        };
        assert!(err.is_decode_error());

        let err = Error::NoAudioTracks {
            path: PathBuf::from("a.wav"),
        };
        assert!(!err.is_decode_error());

        let err = Error::InvalidTimeline {
            reason: "unsorted".to_string(),
        };
        assert!(!err.is_decode_error());
    }

    #[test]
    fn test_cancelled_message() {
        let err = Error::Cancelled {
            completed: 3,
            total: 10,
        };
        assert_eq!(err.to_string(), "cancelled after 3 of 10 file(s)");
    }
}
