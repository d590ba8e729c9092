//! Application-wide constants.
//!
//! Magic numbers and file names live here so output layout and segmentation
//! defaults are tracked in one place.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "corpus-vad";

/// File name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default probability cutoff at or above which a frame counts as speech.
pub const DEFAULT_THRESHOLD: f32 = 0.25;

/// Default minimum segment duration in seconds after merging.
pub const DEFAULT_MIN_DURATION: f64 = 0.5;

/// Maximum silent gap in seconds that still joins two detections into one segment.
pub const MERGE_GAP_SECS: f64 = 0.25;

/// Default output directory for tables and reports.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default number of worker threads.
pub const DEFAULT_JOBS: usize = 1;

/// Upper bound on worker threads.
pub const MAX_JOBS: usize = 256;

/// Default audio file extensions considered part of the corpus.
pub const DEFAULT_AUDIO_EXTENSIONS: &[&str] = &["wav"];

/// Every extension the decoder can handle.
pub const SUPPORTED_AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "m4a", "aac"];

/// Segment identifier formatting.
pub mod segment_id {
    /// Decimal places of start/end inside a segment id and exported clip name.
    pub const DECIMAL_PLACES: usize = 2;
}

/// Segment table formatting.
pub mod table {
    /// Decimal places for start, end and duration columns.
    pub const DECIMAL_PLACES: i32 = 6;

    /// Column header row.
    pub const HEADER: [&str; 5] = ["filename", "segment_id", "start", "end", "duration"];

    /// Rows buffered before a Parquet record batch is flushed.
    pub const PARQUET_BATCH_ROWS: usize = 1000;
}

/// Histogram binning.
pub mod histogram {
    /// Maximum number of equal-width buckets.
    pub const BINS: usize = 10;

    /// Half-width used when every duration in the sample is identical.
    pub const DEGENERATE_HALF_WIDTH: f64 = 0.5;

    /// Width of the longest bar in the text rendering.
    pub const BAR_WIDTH: usize = 50;
}

/// Energy detector defaults.
pub mod energy {
    /// Analysis frame length in milliseconds.
    pub const DEFAULT_FRAME_MS: u32 = 30;

    /// Level in dBFS mapped to probability 0.
    pub const DEFAULT_FLOOR_DB: f32 = -60.0;

    /// Level in dBFS mapped to probability 1.
    pub const DEFAULT_CEILING_DB: f32 = -20.0;
}

/// Sidecar timeline file suffix appended to the audio file stem.
pub const SIDECAR_SUFFIX: &str = ".vad.csv";

/// Output file names.
pub mod output_files {
    /// Segment table (CSV).
    pub const SEGMENTS_CSV: &str = "speech_segments.csv";
    /// Segment table (Parquet).
    pub const SEGMENTS_PARQUET: &str = "speech_segments.parquet";
    /// Text report.
    pub const REPORT_TXT: &str = "report.txt";
    /// JSON report.
    pub const REPORT_JSON: &str = "report.json";
    /// Histogram bucket table.
    pub const HISTOGRAM_CSV: &str = "segment_durations_histogram.csv";
    /// Rendered histogram.
    pub const HISTOGRAM_TXT: &str = "segment_durations_histogram.txt";
    /// Files classified as processed.
    pub const PROCESSED_LIST: &str = "processed_files.log";
    /// Files without speech.
    pub const WARNING_LIST: &str = "warning_files.log";
    /// Files that failed.
    pub const ERROR_LIST: &str = "error_files.log";
    /// Default subdirectory for exported segment audio.
    pub const EXPORT_DIR: &str = "segments";
}
