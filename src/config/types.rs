//! Configuration type definitions.

use crate::constants::{
    DEFAULT_AUDIO_EXTENSIONS, DEFAULT_JOBS, DEFAULT_MIN_DURATION, DEFAULT_THRESHOLD, energy,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default analysis settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Speech detector settings.
    #[serde(default)]
    pub detector: DetectorConfig,
}

/// Default analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Probability cutoff at or above which a frame is speech.
    pub threshold: f32,

    /// Minimum kept segment duration in seconds.
    pub min_duration: f64,

    /// Write one WAV file per segment.
    pub export_segments: bool,

    /// Segment table formats.
    pub formats: Vec<OutputFormat>,

    /// Worker threads.
    pub jobs: usize,

    /// Audio file extensions included when scanning directories.
    pub extensions: Vec<String>,

    /// Output directory for tables and reports.
    pub output_dir: Option<PathBuf>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_duration: DEFAULT_MIN_DURATION,
            export_segments: false,
            formats: vec![OutputFormat::Csv],
            jobs: DEFAULT_JOBS,
            extensions: DEFAULT_AUDIO_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            output_dir: None,
        }
    }
}

/// Speech detector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Which detector produces activity timelines.
    pub kind: DetectorKind,

    /// Energy detector frame length in milliseconds.
    pub frame_ms: u32,

    /// Energy detector level mapped to probability 0 (dBFS).
    pub floor_db: f32,

    /// Energy detector level mapped to probability 1 (dBFS).
    pub ceiling_db: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            kind: DetectorKind::default(),
            frame_ms: energy::DEFAULT_FRAME_MS,
            floor_db: energy::DEFAULT_FLOOR_DB,
            ceiling_db: energy::DEFAULT_CEILING_DB,
        }
    }
}

/// Available speech detectors.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    /// Frame RMS level.
    #[default]
    Energy,
    /// Precomputed `<stem>.vad.csv` timelines.
    Sidecar,
}

impl std::fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Energy => write!(f, "energy"),
            Self::Sidecar => write!(f, "sidecar"),
        }
    }
}

impl std::str::FromStr for DetectorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "energy" => Ok(Self::Energy),
            "sidecar" | "csv" => Ok(Self::Sidecar),
            other => Err(format!("unknown detector: {other}")),
        }
    }
}

/// Segment table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CSV table.
    Csv,
    /// Apache Parquet table.
    Parquet,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Parquet => write!(f, "parquet"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
