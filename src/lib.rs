//! corpus-vad - speech segmentation and statistics for audio corpora.
//!
//! Turns per-frame voice activity into speech segments per file, aggregates
//! corpus-wide duration statistics and writes tables and reports.

#![warn(missing_docs)]

pub mod audio;
pub mod cli;
pub mod config;
pub mod constants;
pub mod detect;
pub mod error;
pub mod export;
pub mod output;
pub mod pipeline;
pub mod segment;
pub mod stats;
pub mod utils;

use clap::{CommandFactory, Parser};
use cli::{AnalyzeArgs, Cli, Command, ConfigAction};
use config::{
    Config, DetectorConfig, OutputFormat, load_default_config, resolve_config_path, save_config,
    validate_settings,
};
use constants::{DEFAULT_OUTPUT_DIR, histogram::BINS, output_files};
use detect::build_detector;
use export::{SegmentExporter, WavSegmentExporter};
use output::{
    CsvSegmentWriter, Histogram, HistogramRenderer, ParquetSegmentWriter, ReportData,
    ReportDocument, RunSettings, SegmentTableWriter, StatusListWriter, TextHistogramRenderer,
    progress, read_segment_tables, write_histogram_csv, write_text_report,
};
use pipeline::{
    BatchContext, InputFile, apply_exclusions, collect_input_files, outcomes_from_table,
    run_batch,
};
use segment::SegmentBuilder;
use stats::{CorpusAggregator, CorpusStats};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{info, warn};
use utils::{read_error_lists, read_exclusion_lists};

pub use error::{Error, Result};

/// Main entry point for the corpus-vad CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.analyze.verbose, cli.analyze.quiet);

    match cli.command {
        Some(Command::Config { action }) => handle_config_command(action, cli.config.as_deref()),
        Some(Command::Report {
            segments,
            errors,
            inputs,
        }) => {
            let config = load_default_config(cli.config.as_deref())?;
            let options = RunOptions::resolve(&cli.analyze, &config)?;
            rebuild_report(&segments, &errors, &inputs, &options)
        }
        None => {
            if cli.inputs.is_empty() {
                Cli::command().print_help()?;
                return Ok(());
            }
            let config = load_default_config(cli.config.as_deref())?;
            let options = RunOptions::resolve(&cli.analyze, &config)?;
            let cancel = install_cancel_handler();
            analyze_corpus(&cli.inputs, &options, &cancel)
        }
    }
}

/// Effective settings after layering CLI flags over the config file.
#[derive(Debug, Clone)]
struct RunOptions {
    output_dir: PathBuf,
    threshold: f32,
    min_duration: f64,
    export_dir: Option<PathBuf>,
    exclude: Vec<PathBuf>,
    jobs: usize,
    detector: DetectorConfig,
    formats: Vec<OutputFormat>,
    extensions: Vec<String>,
    progress: bool,
}

impl RunOptions {
    /// Passing `--export-dir` enables export on its own.
    fn resolve(args: &AnalyzeArgs, config: &Config) -> Result<Self> {
        let defaults = &config.defaults;

        let output_dir = args
            .output_dir
            .clone()
            .or_else(|| defaults.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let export_enabled =
            args.export_segments || defaults.export_segments || args.export_dir.is_some();
        let export_dir = if export_enabled {
            Some(
                args.export_dir
                    .clone()
                    .unwrap_or_else(|| output_dir.join(output_files::EXPORT_DIR)),
            )
        } else {
            None
        };

        let mut detector = config.detector.clone();
        if let Some(kind) = args.detector {
            detector.kind = kind;
        }

        let options = Self {
            threshold: args.threshold.unwrap_or(defaults.threshold),
            min_duration: args.min_duration.unwrap_or(defaults.min_duration),
            jobs: args.jobs.unwrap_or(defaults.jobs),
            formats: args
                .format
                .clone()
                .unwrap_or_else(|| defaults.formats.clone()),
            extensions: defaults.extensions.clone(),
            exclude: args.exclude.clone(),
            progress: !args.quiet && !args.no_progress,
            output_dir,
            export_dir,
            detector,
        };

        validate_settings(options.threshold, options.min_duration, options.jobs)?;
        Ok(options)
    }
}

/// Segment every file, stream the segment table and write the reports.
fn analyze_corpus(inputs: &[PathBuf], options: &RunOptions, cancel: &AtomicBool) -> Result<()> {
    let total_start = Instant::now();

    check_lists_outside_output(&options.exclude, &options.output_dir)?;
    let files = discover_files(inputs, options)?;
    info!("Found {} audio file(s)", files.len());
    create_output_dir(&options.output_dir)?;

    let detector = build_detector(&options.detector);
    let builder = SegmentBuilder::new(options.threshold, options.min_duration)?;
    let exporter = options.export_dir.clone().map(WavSegmentExporter::new);
    if let Some(exporter) = &exporter {
        info!("Exporting segment audio to {}", exporter.output_dir().display());
    }

    let mut tables = open_table_writers(&options.output_dir, &options.formats)?;
    for table in &mut tables {
        table.write_header()?;
    }
    let mut status_lists = StatusListWriter::new(&options.output_dir)?;
    let mut aggregator = CorpusAggregator::new();
    let file_progress = progress::create_file_progress(files.len(), options.progress);

    let ctx = BatchContext {
        detector: detector.as_ref(),
        builder: &builder,
        exporter: exporter.as_ref().map(|e| e as &dyn SegmentExporter),
        jobs: options.jobs,
        cancel,
    };

    let batch = run_batch(&files, ctx, |outcome| {
        aggregator.fold(&outcome);
        for table in &mut tables {
            table.write_outcome(&outcome)?;
        }
        status_lists.record(&outcome)?;
        progress::inc_progress(file_progress.as_ref(), &outcome.name);
        Ok(())
    })?;

    for table in &mut tables {
        table.finalize()?;
    }
    status_lists.finalize()?;
    progress::finish_progress(
        file_progress,
        if batch.cancelled { "Cancelled" } else { "Complete" },
    );

    let stats = aggregator.finalize();
    let settings = RunSettings {
        threshold: options.threshold,
        min_duration: options.min_duration,
        merge_gap: builder.merge_gap(),
        detector: detector.name().to_string(),
        export_segments: exporter.is_some(),
        jobs: options.jobs,
        inputs: inputs.to_vec(),
    };
    let report = write_reports(
        &stats,
        &options.output_dir,
        ReportSource::Run(&settings),
        !batch.cancelled,
    )?;
    print_report(&report);

    info!(
        "{} file(s): {} with speech, {} without speech, {} failed in {:.2}s",
        stats.files_total,
        stats.files_processed,
        stats.files_without_speech,
        stats.files_with_error,
        total_start.elapsed().as_secs_f64()
    );
    if stats.export_failures > 0 {
        warn!("{} segment(s) could not be exported", stats.export_failures);
    }

    if batch.cancelled {
        return Err(Error::Cancelled {
            completed: batch.completed,
            total: batch.total,
        });
    }
    Ok(())
}

/// Recompute the report from the segment tables of one or more runs and
/// the audio they came from.
///
/// The merged, de-duplicated table and the status lists are written to the
/// output directory next to the report.
fn rebuild_report(
    segments: &[PathBuf],
    errors: &[PathBuf],
    inputs: &[PathBuf],
    options: &RunOptions,
) -> Result<()> {
    let files = discover_files(inputs, options)?;
    let rows = read_segment_tables(segments)?;
    let error_messages = read_error_lists(errors)?;
    info!(
        "Rebuilding report from {} row(s) in {} table(s) over {} audio file(s)",
        rows.len(),
        segments.len(),
        files.len()
    );
    create_output_dir(&options.output_dir)?;

    let mut tables = open_table_writers(&options.output_dir, &options.formats)?;
    for table in &mut tables {
        table.write_header()?;
    }
    let mut status_lists = StatusListWriter::new(&options.output_dir)?;
    let mut aggregator = CorpusAggregator::new();
    for outcome in outcomes_from_table(&files, &rows, &error_messages) {
        aggregator.fold(&outcome);
        for table in &mut tables {
            table.write_outcome(&outcome)?;
        }
        status_lists.record(&outcome)?;
    }
    for table in &mut tables {
        table.finalize()?;
    }
    status_lists.finalize()?;

    let report = write_reports(
        &aggregator.finalize(),
        &options.output_dir,
        ReportSource::Tables(segments),
        true,
    )?;
    print_report(&report);
    Ok(())
}

fn discover_files(inputs: &[PathBuf], options: &RunOptions) -> Result<Vec<InputFile>> {
    let files = collect_input_files(inputs, &options.extensions)?;
    let excluded = read_exclusion_lists(&options.exclude)?;
    let files = apply_exclusions(files, &excluded);
    if files.is_empty() {
        return Err(Error::EmptyCorpus);
    }
    Ok(files)
}

/// A run rewrites the status lists in its output directory, so lists read
/// for `--exclude` must live elsewhere.
fn check_lists_outside_output(exclude: &[PathBuf], output_dir: &Path) -> Result<()> {
    let Ok(output_dir) = output_dir.canonicalize() else {
        return Ok(());
    };
    let rewritten = [
        output_files::PROCESSED_LIST,
        output_files::WARNING_LIST,
        output_files::ERROR_LIST,
    ];

    for list in exclude {
        let Ok(list) = list.canonicalize() else {
            continue;
        };
        let in_output = list.parent() == Some(output_dir.as_path())
            && list
                .file_name()
                .is_some_and(|name| rewritten.iter().any(|r| name == *r));
        if in_output {
            return Err(Error::ConfigValidation {
                message: format!(
                    "exclusion list '{}' would be overwritten by this run; \
                     write to another --output-dir and merge the runs with `report`",
                    list.display()
                ),
            });
        }
    }
    Ok(())
}

fn create_output_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::OutputDirCreateFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// The CSV table is always written; Parquet only when requested.
fn open_table_writers(
    output_dir: &Path,
    formats: &[OutputFormat],
) -> Result<Vec<Box<dyn SegmentTableWriter>>> {
    let mut writers: Vec<Box<dyn SegmentTableWriter>> = vec![Box::new(CsvSegmentWriter::new(
        &output_dir.join(output_files::SEGMENTS_CSV),
    )?)];
    if formats.contains(&OutputFormat::Parquet) {
        writers.push(Box::new(ParquetSegmentWriter::new(
            &output_dir.join(output_files::SEGMENTS_PARQUET),
        )?));
    }
    Ok(writers)
}

/// Where the segments behind a report came from.
enum ReportSource<'a> {
    Run(&'a RunSettings),
    Tables(&'a [PathBuf]),
}

fn write_reports(
    stats: &CorpusStats,
    output_dir: &Path,
    source: ReportSource<'_>,
    complete: bool,
) -> Result<ReportData> {
    let report = ReportData::from_stats(stats);
    write_text_report(&report, &output_dir.join(output_files::REPORT_TXT))?;

    let histogram = Histogram::from_durations(&stats.durations, BINS);
    write_histogram_csv(&histogram, &output_dir.join(output_files::HISTOGRAM_CSV))?;
    let renderer: &dyn HistogramRenderer = &TextHistogramRenderer::default();
    renderer.render(&histogram, &output_dir.join(output_files::HISTOGRAM_TXT))?;

    let mut document = ReportDocument::new(&report, &histogram, complete);
    match source {
        ReportSource::Run(settings) => document.settings = Some(settings),
        ReportSource::Tables(paths) => document.segment_tables = paths,
    }
    document.write(&output_dir.join(output_files::REPORT_JSON))?;

    if stats.segment_count == 0 {
        warn!("No speech segments found in any file");
    }
    info!("Reports written to {}", output_dir.display());
    Ok(report)
}

#[allow(clippy::print_stdout)]
fn print_report(report: &ReportData) {
    print!("{}", report.render_text());
}

/// Ctrl+C stops new files from being started; files in flight finish and
/// the report covers everything completed.
fn install_cancel_handler() -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        eprintln!("Interrupted, finishing files in progress (Ctrl+C again to abort)");
    }) {
        warn!("Failed to install Ctrl+C handler: {e}");
    }
    cancel
}

/// Initialize logging based on verbosity level.
fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: ConfigAction, explicit: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = resolve_config_path(explicit)?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                save_config(&Config::default(), &path)?;
                println!("Created configuration file: {}", path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config(explicit)?;
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| Error::ConfigSerialize { source: e })?;
            println!("{rendered}");
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", resolve_config_path(explicit)?.display());
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> AnalyzeArgs {
        let mut full = vec!["corpus-vad"];
        full.extend_from_slice(argv);
        Cli::try_parse_from(full).unwrap().analyze
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = Config::default();
        config.defaults.threshold = 0.6;
        config.defaults.min_duration = 2.0;

        let options = RunOptions::resolve(&args(&["-t", "0.3"]), &config).unwrap();
        assert_eq!(options.threshold, 0.3);
        assert_eq!(options.min_duration, 2.0);
        assert_eq!(options.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert!(options.export_dir.is_none());
    }

    #[test]
    fn test_export_dir_defaults_under_output_dir() {
        let options =
            RunOptions::resolve(&args(&["-o", "out", "--export-segments"]), &Config::default())
                .unwrap();
        assert_eq!(options.export_dir, Some(PathBuf::from("out").join("segments")));
    }

    #[test]
    fn test_export_dir_flag_enables_export() {
        let options =
            RunOptions::resolve(&args(&["--export-dir", "clips"]), &Config::default()).unwrap();
        assert_eq!(options.export_dir, Some(PathBuf::from("clips")));
    }

    #[test]
    fn test_exclusion_list_in_output_dir_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let list = dir.path().join(output_files::PROCESSED_LIST);
        std::fs::write(&list, "a.wav\n").unwrap();

        let err = check_lists_outside_output(std::slice::from_ref(&list), dir.path()).unwrap_err();
        assert!(err.to_string().contains("would be overwritten"));

        let elsewhere = tempfile::TempDir::new().unwrap();
        assert!(check_lists_outside_output(&[list], elsewhere.path()).is_ok());
    }

    #[test]
    fn test_invalid_config_threshold_rejected() {
        let mut config = Config::default();
        config.defaults.threshold = 1.5;
        assert!(matches!(
            RunOptions::resolve(&args(&[]), &config),
            Err(Error::ConfigValidation { .. })
        ));
    }
}
