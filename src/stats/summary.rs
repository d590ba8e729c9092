//! Finalized corpus statistics.

use serde::Serialize;

/// Lower, middle and upper quartile of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quartiles {
    /// 25th percentile.
    pub q1: f64,
    /// Median.
    pub q2: f64,
    /// 75th percentile.
    pub q3: f64,
}

/// Corpus statistics computed once every file has been folded in.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusStats {
    /// Files seen, whatever their status.
    pub files_total: usize,
    /// Files with at least one segment.
    pub files_processed: usize,
    /// Files that decoded but produced no segment.
    pub files_without_speech: usize,
    /// Files that failed.
    pub files_with_error: usize,
    /// Sum of known file durations in seconds.
    pub total_audio_duration: f64,
    /// Sum of segment durations in seconds.
    pub total_speech_duration: f64,
    /// Number of segments.
    pub segment_count: usize,
    /// Longest segment in seconds (0 when there are none).
    pub max_duration: f64,
    /// Mean segment duration (0 when there are none).
    pub mean_duration: f64,
    /// Population standard deviation of segment durations.
    pub std_duration: f64,
    /// Quartiles of segment durations, `None` when there are no segments.
    pub quartiles: Option<Quartiles>,
    /// Segments whose audio export failed.
    pub export_failures: usize,
    /// All segment durations, sorted ascending.
    pub durations: Vec<f64>,
}

impl CorpusStats {
    /// Share of audio classified as speech, in percent.
    ///
    /// Zero when no audio duration is known.
    pub fn speech_percentage(&self) -> f64 {
        if self.total_audio_duration > 0.0 {
            self.total_speech_duration / self.total_audio_duration * 100.0
        } else {
            0.0
        }
    }

    /// Share of audio not classified as speech, in percent.
    ///
    /// Zero when no audio duration is known.
    pub fn non_speech_percentage(&self) -> f64 {
        if self.total_audio_duration > 0.0 {
            100.0 - self.speech_percentage()
        } else {
            0.0
        }
    }
}

/// Linear-interpolation quantile of a sorted sample at rank `p * (n - 1)`.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;

    #[allow(clippy::cast_precision_loss)]
    let rank = p.clamp(0.0, 1.0) * last as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(last);
    #[allow(clippy::cast_precision_loss)]
    let fraction = rank - lower as f64;

    Some(fraction.mul_add(sorted[upper] - sorted[lower], sorted[lower]))
}

/// Quartiles of a sorted sample.
pub fn quartiles(sorted: &[f64]) -> Option<Quartiles> {
    Some(Quartiles {
        q1: quantile(sorted, 0.25)?,
        q2: quantile(sorted, 0.5)?,
        q3: quantile(sorted, 0.75)?,
    })
}

/// Arithmetic mean (0 for an empty sample).
pub fn mean(sample: &[f64]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = sample.len() as f64;
    sample.iter().sum::<f64>() / n
}

/// Population standard deviation, two-pass (0 for an empty sample).
pub fn population_std(sample: &[f64]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    let m = mean(sample);
    #[allow(clippy::cast_precision_loss)]
    let n = sample.len() as f64;
    let variance = sample.iter().map(|x| (x - m).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quartiles_linear_interpolation() {
        let q = quartiles(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((q.q1 - 1.75).abs() < 1e-12);
        assert!((q.q2 - 2.5).abs() < 1e-12);
        assert!((q.q3 - 3.25).abs() < 1e-12);
    }

    #[test]
    fn test_quartiles_single_value() {
        let q = quartiles(&[2.0]).unwrap();
        assert_eq!(q, Quartiles { q1: 2.0, q2: 2.0, q3: 2.0 });
    }

    #[test]
    fn test_quartiles_empty() {
        assert!(quartiles(&[]).is_none());
    }

    #[test]
    fn test_quantile_extremes() {
        let sample = [1.0, 5.0, 9.0];
        assert_eq!(quantile(&sample, 0.0), Some(1.0));
        assert_eq!(quantile(&sample, 1.0), Some(9.0));
        assert_eq!(quantile(&sample, 0.5), Some(5.0));
    }

    #[test]
    fn test_population_std() {
        let sample = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&sample) - 5.0).abs() < 1e-12);
        assert!((population_std(&sample) - 2.0).abs() < 1e-12);
        assert_eq!(population_std(&[]), 0.0);
    }
}
