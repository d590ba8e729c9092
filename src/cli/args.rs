//! CLI argument definitions.

use crate::cli::validators::{parse_jobs, parse_min_duration, parse_threshold};
use crate::config::{DetectorKind, OutputFormat};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Speech segmentation and statistics for audio corpora.
#[derive(Debug, Parser)]
#[command(name = "corpus-vad")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Input audio files or directories (searched recursively).
    pub inputs: Vec<PathBuf>,

    /// Path to a configuration file (default: platform config directory).
    #[arg(long, global = true, env = "CORPUS_VAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Common options for analysis.
    #[command(flatten)]
    pub analyze: AnalyzeArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Rebuild the report from the segment tables of one or more runs.
    ///
    /// Tables are merged and repeated rows dropped, so a corpus analyzed in
    /// several resumed runs reports as one.
    Report {
        /// Segment table written by a previous run (repeat for several runs).
        #[arg(long, value_name = "FILE", required = true)]
        segments: Vec<PathBuf>,
        /// Error list of a previous run (repeat for several runs).
        #[arg(long, value_name = "FILE")]
        errors: Vec<PathBuf>,
        /// Audio files or directories the table was built from.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the analyze command.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Output directory for tables, reports and file lists.
    #[arg(short, long, global = true, env = "CORPUS_VAD_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Activity probability at or above which a frame counts as speech.
    #[arg(short, long, value_parser = parse_threshold, env = "CORPUS_VAD_THRESHOLD")]
    pub threshold: Option<f32>,

    /// Minimum segment duration in seconds.
    #[arg(long, value_parser = parse_min_duration, env = "CORPUS_VAD_MIN_DURATION")]
    pub min_duration: Option<f64>,

    /// Write each segment's audio as a WAV file.
    #[arg(long, env = "CORPUS_VAD_EXPORT_SEGMENTS")]
    pub export_segments: bool,

    /// Directory for exported segment audio (default: <output-dir>/segments).
    #[arg(long, env = "CORPUS_VAD_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,

    /// Skip files named in these lists (one file name per line).
    #[arg(long, value_name = "FILE", num_args = 1..)]
    pub exclude: Vec<PathBuf>,

    /// Number of worker threads.
    #[arg(short, long, value_parser = parse_jobs, env = "CORPUS_VAD_JOBS")]
    pub jobs: Option<usize>,

    /// Speech detector (energy, sidecar).
    #[arg(long, env = "CORPUS_VAD_DETECTOR")]
    pub detector: Option<DetectorKind>,

    /// Segment table formats (comma-separated: csv,parquet).
    #[arg(short, long, value_delimiter = ',', env = "CORPUS_VAD_FORMAT")]
    pub format: Option<Vec<OutputFormat>>,

    /// Only log warnings and errors; hide progress.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Hide the progress bar.
    #[arg(long, env = "CORPUS_VAD_NO_PROGRESS")]
    pub no_progress: bool,
}
