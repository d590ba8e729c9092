//! Segment duration histogram.

use crate::constants::histogram::{BAR_WIDTH, DEGENERATE_HALF_WIDTH};
use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// One equal-width bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBucket {
    /// Inclusive lower bound in seconds.
    pub lower: f64,
    /// Upper bound in seconds (exclusive, except for the last bucket).
    pub upper: f64,
    /// Durations falling into the bucket.
    pub count: usize,
}

/// Equal-width histogram over a duration sample.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    buckets: Vec<HistogramBucket>,
}

impl Histogram {
    /// Bucket `durations` into `min(max_bins, n)` equal-width buckets
    /// spanning the sample's range.
    ///
    /// When every value is identical the range is widened by half a second
    /// on each side. An empty sample yields an empty histogram.
    pub fn from_durations(durations: &[f64], max_bins: usize) -> Self {
        let bins = max_bins.min(durations.len());
        if bins == 0 {
            return Self::default();
        }

        let (mut lo, mut hi) = durations
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &d| {
                (lo.min(d), hi.max(d))
            });
        if hi - lo <= 0.0 {
            lo -= DEGENERATE_HALF_WIDTH;
            hi += DEGENERATE_HALF_WIDTH;
        }

        #[allow(clippy::cast_precision_loss)]
        let width = (hi - lo) / bins as f64;

        #[allow(clippy::cast_precision_loss)]
        let mut buckets: Vec<HistogramBucket> = (0..bins)
            .map(|i| HistogramBucket {
                lower: (i as f64).mul_add(width, lo),
                upper: if i + 1 == bins {
                    hi
                } else {
                    ((i + 1) as f64).mul_add(width, lo)
                },
                count: 0,
            })
            .collect();

        for &d in durations {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = (((d - lo) / width).floor().max(0.0) as usize).min(bins - 1);
            buckets[index].count += 1;
        }

        Self { buckets }
    }

    /// Buckets in ascending order.
    pub fn buckets(&self) -> &[HistogramBucket] {
        &self.buckets
    }

    /// Number of values counted.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Whether there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Renders a histogram to a file.
pub trait HistogramRenderer {
    /// Render `histogram` to `path`.
    fn render(&self, histogram: &Histogram, path: &Path) -> Result<()>;
}

/// Plain-text horizontal bar chart.
#[derive(Debug, Clone, Copy)]
pub struct TextHistogramRenderer {
    bar_width: usize,
}

impl Default for TextHistogramRenderer {
    fn default() -> Self {
        Self {
            bar_width: BAR_WIDTH,
        }
    }
}

impl TextHistogramRenderer {
    /// Render to a string.
    pub fn render_to_string(&self, histogram: &Histogram) -> String {
        let mut out = String::from("Segment duration histogram\n");
        let _ = writeln!(out, "Segments: {}", histogram.total());

        let max_count = histogram
            .buckets()
            .iter()
            .map(|b| b.count)
            .max()
            .unwrap_or(0);

        for bucket in histogram.buckets() {
            let bar_len = if max_count == 0 {
                0
            } else {
                (bucket.count * self.bar_width / max_count).max(usize::from(bucket.count > 0))
            };
            let _ = writeln!(
                out,
                "{:>9.3} - {:>9.3} s | {:<width$} {}",
                bucket.lower,
                bucket.upper,
                "#".repeat(bar_len),
                bucket.count,
                width = self.bar_width
            );
        }

        out
    }
}

impl HistogramRenderer for TextHistogramRenderer {
    fn render(&self, histogram: &Histogram, path: &Path) -> Result<()> {
        std::fs::write(path, self.render_to_string(histogram))?;
        Ok(())
    }
}

/// Write the bucket table as CSV (`lower,upper,count`).
pub fn write_histogram_csv(histogram: &Histogram, path: &Path) -> Result<()> {
    let csv_error = |e| Error::CsvWrite {
        path: path.to_path_buf(),
        source: e,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer
        .write_record(["lower", "upper", "count"])
        .map_err(csv_error)?;
    for bucket in histogram.buckets() {
        writer
            .write_record([
                format!("{:.6}", bucket.lower),
                format!("{:.6}", bucket.upper),
                bucket.count.to_string(),
            ])
            .map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::constants::histogram::BINS;
    use tempfile::TempDir;

    #[test]
    fn test_empty_sample() {
        let histogram = Histogram::from_durations(&[], BINS);
        assert!(histogram.is_empty());
        assert_eq!(histogram.total(), 0);
    }

    #[test]
    fn test_bins_capped_by_sample_size() {
        let histogram = Histogram::from_durations(&[1.0, 2.0, 3.0], BINS);
        assert_eq!(histogram.buckets().len(), 3);
        assert_eq!(histogram.total(), 3);
    }

    #[test]
    fn test_max_lands_in_last_bucket() {
        let durations: Vec<f64> = (0..=20).map(|i| f64::from(i) * 0.5).collect();
        let histogram = Histogram::from_durations(&durations, BINS);
        let buckets = histogram.buckets();
        assert_eq!(buckets.len(), BINS);
        assert_eq!(buckets[0].lower, 0.0);
        assert_eq!(buckets[BINS - 1].upper, 10.0);
        assert_eq!(histogram.total(), 21);
        assert_eq!(buckets[BINS - 1].count, 3);
    }

    #[test]
    fn test_identical_values_widen_range() {
        let histogram = Histogram::from_durations(&[2.0, 2.0], BINS);
        let buckets = histogram.buckets();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].lower, 1.5);
        assert_eq!(buckets[1].upper, 2.5);
        assert_eq!(buckets[1].count, 2);
    }

    #[test]
    fn test_deterministic() {
        let durations = [0.7, 3.2, 1.1, 0.9, 5.5, 2.0];
        assert_eq!(
            Histogram::from_durations(&durations, BINS),
            Histogram::from_durations(&durations, BINS)
        );
    }

    #[test]
    fn test_text_render_and_csv() {
        let dir = TempDir::new().unwrap();
        let histogram = Histogram::from_durations(&[1.0, 1.2, 3.0, 4.0], BINS);

        let txt = dir.path().join("h.txt");
        TextHistogramRenderer::default()
            .render(&histogram, &txt)
            .unwrap();
        let text = std::fs::read_to_string(&txt).unwrap();
        assert!(text.contains("Segments: 4"));
        assert!(text.contains('#'));

        let csv_path = dir.path().join("h.csv");
        write_histogram_csv(&histogram, &csv_path).unwrap();
        let csv_text = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(csv_text.lines().count(), 5);
        assert!(csv_text.starts_with("lower,upper,count\n"));
    }
}
