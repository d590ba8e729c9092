//! Corpus report: structured record, text rendering and JSON document.

use crate::error::{Error, Result};
use crate::output::histogram::{Histogram, HistogramBucket};
use crate::stats::{CorpusStats, Quartiles};
use crate::utils::human_readable_duration;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Report values derived from corpus statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportData {
    /// Files seen.
    pub total_files: usize,
    /// Files that decoded but had no speech.
    pub files_without_speech: usize,
    /// Files that failed.
    pub files_with_error: usize,
    /// Files with at least one segment.
    pub files_processed: usize,
    /// Sum of known file durations in seconds.
    pub total_audio_duration: f64,
    /// Sum of segment durations in seconds.
    pub total_speech_duration: f64,
    /// Speech share in percent.
    pub percentage_of_speech: f64,
    /// Non-speech share in percent.
    pub percentage_of_non_speech: f64,
    /// Number of segments.
    pub total_segments: usize,
    /// Longest segment in seconds.
    pub max_segment_duration: f64,
    /// Quartiles, absent without segments.
    pub quartiles: Option<Quartiles>,
    /// Mean segment duration in seconds.
    pub mean_segment_duration: f64,
    /// Population standard deviation of segment durations.
    pub std_segment_duration: f64,
    /// Segments whose audio export failed.
    pub export_failures: usize,
}

impl ReportData {
    /// Build the report record.
    pub fn from_stats(stats: &CorpusStats) -> Self {
        Self {
            total_files: stats.files_total,
            files_without_speech: stats.files_without_speech,
            files_with_error: stats.files_with_error,
            files_processed: stats.files_processed,
            total_audio_duration: stats.total_audio_duration,
            total_speech_duration: stats.total_speech_duration,
            percentage_of_speech: stats.speech_percentage(),
            percentage_of_non_speech: stats.non_speech_percentage(),
            total_segments: stats.segment_count,
            max_segment_duration: stats.max_duration,
            quartiles: stats.quartiles,
            mean_segment_duration: stats.mean_duration,
            std_segment_duration: stats.std_duration,
            export_failures: stats.export_failures,
        }
    }

    /// Render as `<label>: <value>` lines.
    pub fn render_text(&self) -> String {
        let quartiles = self.quartiles.map_or_else(
            || "n/a".to_string(),
            |q| format!("[{:.2}, {:.2}, {:.2}]", q.q1, q.q2, q.q3),
        );

        let mut out = String::new();
        let _ = writeln!(out, "Total Number of Files: {}", self.total_files);
        let _ = writeln!(
            out,
            "Number of Files Without Speech: {}",
            self.files_without_speech
        );
        let _ = writeln!(
            out,
            "Total Audio Duration: {:.2} seconds => {}",
            self.total_audio_duration,
            human_readable_duration(self.total_audio_duration)
        );
        let _ = writeln!(
            out,
            "Total Speech Duration: {:.2} seconds => {}",
            self.total_speech_duration,
            human_readable_duration(self.total_speech_duration)
        );
        let _ = writeln!(out, "Percentage of Speech: {:.2}%", self.percentage_of_speech);
        let _ = writeln!(
            out,
            "Percentage of Non-Speech: {:.2}%",
            self.percentage_of_non_speech
        );
        let _ = writeln!(out, "Total Number of Speech Segments: {}", self.total_segments);
        let _ = writeln!(
            out,
            "Maximum Segment Duration: {:.2} seconds",
            self.max_segment_duration
        );
        let _ = writeln!(out, "Segment Duration Quartiles: {quartiles}");
        let _ = writeln!(
            out,
            "Mean Segment Duration: {:.2} seconds",
            self.mean_segment_duration
        );
        let _ = writeln!(
            out,
            "Standard Deviation of Segment Durations: {:.2} seconds",
            self.std_segment_duration
        );
        let _ = writeln!(out, "Number of Files With Errors: {}", self.files_with_error);
        let _ = writeln!(out, "Segment Export Failures: {}", self.export_failures);
        out
    }
}

/// Settings of the run that produced a report.
#[derive(Debug, Clone, Serialize)]
pub struct RunSettings {
    /// Activity threshold.
    pub threshold: f32,
    /// Minimum segment duration in seconds.
    pub min_duration: f64,
    /// Merge-gap tolerance in seconds.
    pub merge_gap: f64,
    /// Detector name.
    pub detector: String,
    /// Whether segment audio was exported.
    pub export_segments: bool,
    /// Worker threads.
    pub jobs: usize,
    /// Input locations as given.
    pub inputs: Vec<PathBuf>,
}

/// JSON report document.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    /// Creation time.
    pub generated_at: DateTime<Utc>,
    /// Version of the tool that wrote the report.
    pub tool_version: &'static str,
    /// False when the run was cancelled before every file was processed.
    pub complete: bool,
    /// Segmentation settings (absent when rebuilt from a segment table).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<&'a RunSettings>,
    /// Segment tables the report was rebuilt from.
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub segment_tables: &'a [PathBuf],
    /// Report values.
    pub report: &'a ReportData,
    /// Duration histogram buckets.
    pub histogram: &'a [HistogramBucket],
}

impl<'a> ReportDocument<'a> {
    /// Document stamped with the current time.
    pub fn new(report: &'a ReportData, histogram: &'a Histogram, complete: bool) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION"),
            complete,
            settings: None,
            segment_tables: &[],
            report,
            histogram: histogram.buckets(),
        }
    }

    /// Write pretty-printed JSON to `path`.
    pub fn write(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|e| {
            Error::JsonWrite {
                path: path.to_path_buf(),
                source: e,
            }
        })
    }
}

/// Write the text report to `path`.
pub fn write_text_report(report: &ReportData, path: &Path) -> Result<()> {
    std::fs::write(path, report.render_text())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::stats::quartiles;
    use tempfile::TempDir;

    fn stats() -> CorpusStats {
        let durations = vec![1.0, 2.0];
        CorpusStats {
            files_total: 2,
            files_processed: 1,
            files_without_speech: 1,
            files_with_error: 0,
            total_audio_duration: 15.0,
            total_speech_duration: 3.0,
            segment_count: 2,
            max_duration: 2.0,
            mean_duration: 1.5,
            std_duration: 0.5,
            quartiles: quartiles(&durations),
            export_failures: 0,
            durations,
        }
    }

    #[test]
    fn test_render_text_line_order() {
        let text = ReportData::from_stats(&stats()).render_text();
        let labels: Vec<&str> = text
            .lines()
            .map(|l| l.split(':').next().unwrap())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Total Number of Files",
                "Number of Files Without Speech",
                "Total Audio Duration",
                "Total Speech Duration",
                "Percentage of Speech",
                "Percentage of Non-Speech",
                "Total Number of Speech Segments",
                "Maximum Segment Duration",
                "Segment Duration Quartiles",
                "Mean Segment Duration",
                "Standard Deviation of Segment Durations",
                "Number of Files With Errors",
                "Segment Export Failures",
            ]
        );
        assert!(text.contains("Percentage of Speech: 20.00%"));
        assert!(text.contains("Total Audio Duration: 15.00 seconds => 0 hours, 0 minutes, 15 seconds"));
        assert!(text.contains("Segment Duration Quartiles: [1.25, 1.50, 1.75]"));
    }

    #[test]
    fn test_render_text_without_segments() {
        let empty = CorpusStats {
            files_total: 1,
            files_processed: 0,
            files_without_speech: 0,
            files_with_error: 1,
            total_audio_duration: 0.0,
            total_speech_duration: 0.0,
            segment_count: 0,
            max_duration: 0.0,
            mean_duration: 0.0,
            std_duration: 0.0,
            quartiles: None,
            export_failures: 0,
            durations: vec![],
        };
        let text = ReportData::from_stats(&empty).render_text();
        assert!(text.contains("Segment Duration Quartiles: n/a"));
        assert!(text.contains("Percentage of Speech: 0.00%"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn test_json_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        let data = ReportData::from_stats(&stats());
        let histogram = Histogram::from_durations(&[1.0, 2.0], 10);
        let settings = RunSettings {
            threshold: 0.25,
            min_duration: 0.5,
            merge_gap: 0.25,
            detector: "energy".to_string(),
            export_segments: false,
            jobs: 1,
            inputs: vec![PathBuf::from("corpus")],
        };

        let mut doc = ReportDocument::new(&data, &histogram, true);
        doc.settings = Some(&settings);
        doc.write(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["complete"], true);
        assert_eq!(value["report"]["total_files"], 2);
        assert_eq!(value["settings"]["detector"], "energy");
        assert_eq!(value["histogram"].as_array().unwrap().len(), 2);
        assert!(value.get("segment_tables").is_none());
        assert!(value["generated_at"].is_string());
    }
}
