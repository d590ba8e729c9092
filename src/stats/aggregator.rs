//! Streaming aggregation of file outcomes.

use crate::pipeline::{FileOutcome, FileStatus};
use crate::segment::Segment;
use crate::stats::summary::{CorpusStats, population_std, quartiles};

/// Running corpus statistics.
///
/// Outcomes are folded in one at a time; partial aggregates built on
/// different threads combine with [`CorpusAggregator::merge`]. Only segment
/// durations are retained, which is what exact quartiles need.
#[derive(Debug, Clone, Default)]
pub struct CorpusAggregator {
    files_total: usize,
    files_processed: usize,
    files_without_speech: usize,
    files_with_error: usize,
    total_audio_duration: f64,
    total_speech_duration: f64,
    max_duration: f64,
    export_failures: usize,
    durations: Vec<f64>,
}

impl CorpusAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one file outcome into the running totals.
    ///
    /// Every file counts towards the file total and, when its duration is
    /// known, towards the audio duration. Only `Processed` files contribute
    /// segments.
    pub fn fold(&mut self, outcome: &FileOutcome) {
        self.files_total += 1;
        if let Some(duration) = outcome.total_duration {
            self.total_audio_duration += duration;
        }

        match &outcome.status {
            FileStatus::Processed => {
                self.files_processed += 1;
                for segment in &outcome.segments {
                    self.push_segment(segment);
                }
                self.export_failures += outcome.export_failures.len();
            }
            FileStatus::NoSpeech => self.files_without_speech += 1,
            FileStatus::Error { .. } => self.files_with_error += 1,
        }
    }

    /// Combine another partial aggregate into this one.
    pub fn merge(&mut self, other: Self) {
        self.files_total += other.files_total;
        self.files_processed += other.files_processed;
        self.files_without_speech += other.files_without_speech;
        self.files_with_error += other.files_with_error;
        self.total_audio_duration += other.total_audio_duration;
        self.total_speech_duration += other.total_speech_duration;
        self.max_duration = self.max_duration.max(other.max_duration);
        self.export_failures += other.export_failures;
        self.durations.extend(other.durations);
    }

    /// Files folded so far.
    pub const fn files_total(&self) -> usize {
        self.files_total
    }

    /// Segments folded so far.
    pub fn segment_count(&self) -> usize {
        self.durations.len()
    }

    /// Files that failed so far.
    pub const fn files_with_error(&self) -> usize {
        self.files_with_error
    }

    /// Compute the final statistics.
    pub fn finalize(self) -> CorpusStats {
        let mut durations = self.durations;
        durations.sort_by(f64::total_cmp);

        let segment_count = durations.len();
        #[allow(clippy::cast_precision_loss)]
        let mean_duration = if segment_count == 0 {
            0.0
        } else {
            self.total_speech_duration / segment_count as f64
        };

        CorpusStats {
            files_total: self.files_total,
            files_processed: self.files_processed,
            files_without_speech: self.files_without_speech,
            files_with_error: self.files_with_error,
            total_audio_duration: self.total_audio_duration,
            total_speech_duration: self.total_speech_duration,
            segment_count,
            max_duration: self.max_duration,
            mean_duration,
            std_duration: population_std(&durations),
            quartiles: quartiles(&durations),
            export_failures: self.export_failures,
            durations,
        }
    }

    fn push_segment(&mut self, segment: &Segment) {
        let duration = segment.duration();
        self.total_speech_duration += duration;
        self.max_duration = self.max_duration.max(duration);
        self.durations.push(duration);
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pipeline::InputFile;
    use std::path::Path;

    fn input(name: &str) -> InputFile {
        InputFile::from_path(Path::new(name))
    }

    fn processed(name: &str, duration: f64, spans: &[(f64, f64)]) -> FileOutcome {
        let id = name.trim_end_matches(".wav");
        FileOutcome::segmented(
            &input(name),
            duration,
            spans.iter().map(|&(s, e)| Segment::new(id, s, e)).collect(),
        )
    }

    #[test]
    fn test_speech_percentage_over_two_files() {
        let mut agg = CorpusAggregator::new();
        agg.fold(&processed("a.wav", 10.0, &[(1.0, 2.0), (4.0, 6.0)]));
        agg.fold(&processed("b.wav", 5.0, &[]));

        let stats = agg.finalize();
        assert_eq!(stats.total_audio_duration, 15.0);
        assert!((stats.total_speech_duration - 3.0).abs() < 1e-12);
        assert!((stats.speech_percentage() - 20.0).abs() < 1e-9);
        assert!((stats.non_speech_percentage() - 80.0).abs() < 1e-9);
        assert_eq!(stats.files_total, 2);
        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.files_without_speech, 1);
        assert_eq!(stats.segment_count, 2);
        assert_eq!(stats.max_duration, 2.0);
        assert!((stats.mean_duration - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_all_files_failing_gives_zero_percentages() {
        let mut agg = CorpusAggregator::new();
        let err = Error::Internal {
            message: "boom".to_string(),
        };
        agg.fold(&FileOutcome::failed(&input("a.wav"), None, &err));
        agg.fold(&FileOutcome::failed(&input("b.wav"), None, &err));

        let stats = agg.finalize();
        assert_eq!(stats.files_with_error, 2);
        assert_eq!(stats.files_total, 2);
        assert_eq!(stats.speech_percentage(), 0.0);
        assert_eq!(stats.non_speech_percentage(), 0.0);
        assert_eq!(stats.mean_duration, 0.0);
        assert!(stats.quartiles.is_none());
    }

    #[test]
    fn test_failed_file_with_known_duration_counts_audio() {
        let mut agg = CorpusAggregator::new();
        let err = Error::InvalidTimeline {
            reason: "unsorted".to_string(),
        };
        agg.fold(&FileOutcome::failed(&input("a.wav"), Some(7.0), &err));
        let stats = agg.finalize();
        assert_eq!(stats.total_audio_duration, 7.0);
        assert_eq!(stats.total_speech_duration, 0.0);
    }

    #[test]
    fn test_merge_matches_sequential_fold() {
        let outcomes = [
            processed("a.wav", 10.0, &[(0.0, 1.0), (2.0, 4.0)]),
            processed("b.wav", 8.0, &[(1.0, 4.0)]),
            processed("c.wav", 3.0, &[]),
            processed("d.wav", 6.0, &[(0.5, 1.5)]),
        ];

        let mut sequential = CorpusAggregator::new();
        for outcome in &outcomes {
            sequential.fold(outcome);
        }

        let mut left = CorpusAggregator::new();
        let mut right = CorpusAggregator::new();
        left.fold(&outcomes[0]);
        left.fold(&outcomes[1]);
        right.fold(&outcomes[2]);
        right.fold(&outcomes[3]);
        left.merge(right);

        assert_eq!(left.finalize(), sequential.finalize());
    }

    #[test]
    fn test_quartiles_from_folded_durations() {
        let mut agg = CorpusAggregator::new();
        agg.fold(&processed(
            "a.wav",
            20.0,
            &[(0.0, 4.0), (5.0, 6.0), (7.0, 10.0), (11.0, 13.0)],
        ));
        let stats = agg.finalize();
        let q = stats.quartiles.unwrap();
        assert!((q.q1 - 1.75).abs() < 1e-12);
        assert!((q.q2 - 2.5).abs() < 1e-12);
        assert!((q.q3 - 3.25).abs() < 1e-12);
        assert_eq!(stats.durations, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
