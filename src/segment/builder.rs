//! Segment construction from an activity timeline.

use crate::constants::MERGE_GAP_SECS;
use crate::error::{Error, Result};
use crate::segment::{ActivityTimeline, Segment};

/// Converts activity timelines into merged, filtered speech segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentBuilder {
    threshold: f32,
    min_duration: f64,
    merge_gap: f64,
}

impl SegmentBuilder {
    /// Create a builder with the default merge-gap tolerance.
    ///
    /// `threshold` must lie strictly between 0 and 1 and `min_duration` must be
    /// finite and non-negative.
    pub fn new(threshold: f32, min_duration: f64) -> Result<Self> {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(Error::ConfigValidation {
                message: format!("threshold must be between 0 and 1 (exclusive), got {threshold}"),
            });
        }
        if !min_duration.is_finite() || min_duration < 0.0 {
            return Err(Error::ConfigValidation {
                message: format!("min_duration must be non-negative, got {min_duration}"),
            });
        }

        Ok(Self {
            threshold,
            min_duration,
            merge_gap: MERGE_GAP_SECS,
        })
    }

    /// Override the merge-gap tolerance.
    #[must_use]
    pub const fn with_merge_gap(mut self, merge_gap: f64) -> Self {
        self.merge_gap = merge_gap;
        self
    }

    /// Probability cutoff.
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Minimum kept segment duration in seconds.
    pub const fn min_duration(&self) -> f64 {
        self.min_duration
    }

    /// Merge-gap tolerance in seconds.
    pub const fn merge_gap(&self) -> f64 {
        self.merge_gap
    }

    /// Build the speech segments of one file.
    ///
    /// Output is sorted by start, non-overlapping, clipped to the file bounds,
    /// and contains only segments lasting at least `min_duration`.
    pub fn build(&self, file_id: &str, timeline: &ActivityTimeline) -> Result<Vec<Segment>> {
        timeline.validate()?;

        let candidates = self.active_runs(timeline);
        let merged = self.merge(candidates);

        Ok(merged
            .into_iter()
            .filter(|(start, end)| end - start >= self.min_duration)
            .map(|(start, end)| Segment::new(file_id, start, end))
            .collect())
    }

    /// Run-length encode active frames into `(start, end)` candidates.
    fn active_runs(&self, timeline: &ActivityTimeline) -> Vec<(f64, f64)> {
        let duration = timeline.duration();
        let mut runs = Vec::new();
        let mut current: Option<(f64, f64)> = None;

        for (i, frame) in timeline.frames().iter().enumerate() {
            let start = frame.time.clamp(0.0, duration);
            let end = timeline.frame_end(i).clamp(0.0, duration);
            if end <= start {
                // Entirely outside the file after clipping.
                continue;
            }

            if frame.probability >= self.threshold {
                current = Some(current.map_or((start, end), |(s, _)| (s, end)));
            } else if let Some(run) = current.take() {
                runs.push(run);
            }
        }

        if let Some(run) = current {
            runs.push(run);
        }

        runs
    }

    /// Join candidates separated by at most the merge gap.
    fn merge(&self, candidates: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
        let mut merged: Vec<(f64, f64)> = Vec::with_capacity(candidates.len());

        for (start, end) in candidates {
            match merged.last_mut() {
                Some(last) if start - last.1 <= self.merge_gap => {
                    last.1 = last.1.max(end);
                }
                _ => merged.push((start, end)),
            }
        }

        merged
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::segment::ActivityFrame;

    fn flags(points: &[(f64, bool)], duration: f64) -> ActivityTimeline {
        ActivityTimeline::new(
            points
                .iter()
                .map(|&(t, s)| ActivityFrame::from_flag(t, s))
                .collect(),
            duration,
        )
    }

    #[test]
    fn test_new_rejects_bad_threshold() {
        assert!(SegmentBuilder::new(0.0, 0.5).is_err());
        assert!(SegmentBuilder::new(1.0, 0.5).is_err());
        assert!(SegmentBuilder::new(f32::NAN, 0.5).is_err());
        assert!(SegmentBuilder::new(0.5, -0.1).is_err());
    }

    #[test]
    fn test_close_detections_merge() {
        let builder = SegmentBuilder::new(0.25, 0.5).unwrap().with_merge_gap(0.1);
        let timeline = flags(
            &[
                (0.0, false),
                (1.0, true),
                (1.4, false),
                (1.45, true),
                (2.0, false),
            ],
            3.0,
        );

        let segments = builder.build("f", &timeline).unwrap();
        assert_eq!(segments, vec![Segment::new("f", 1.0, 2.0)]);
    }

    #[test]
    fn test_short_speech_dropped() {
        let builder = SegmentBuilder::new(0.25, 0.5).unwrap();
        let timeline = flags(&[(0.0, true), (0.2, false)], 4.0);
        assert!(builder.build("f", &timeline).unwrap().is_empty());
    }

    #[test]
    fn test_exact_min_duration_kept() {
        let builder = SegmentBuilder::new(0.25, 0.5).unwrap();
        let timeline = flags(&[(0.0, false), (1.0, true), (1.5, false)], 4.0);
        assert_eq!(builder.build("f", &timeline).unwrap().len(), 1);
    }

    #[test]
    fn test_gap_wider_than_tolerance_stays_split() {
        let builder = SegmentBuilder::new(0.25, 0.0).unwrap();
        let timeline = flags(
            &[(0.0, true), (1.0, false), (1.5, true), (2.0, false)],
            3.0,
        );
        let segments = builder.build("f", &timeline).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].start, 1.5);
    }

    #[test]
    fn test_all_speech_single_segment() {
        let builder = SegmentBuilder::new(0.25, 0.5).unwrap();
        let timeline = ActivityTimeline::from_probabilities(&[0.9; 10], 0.1, 1.0);
        let segments = builder.build("f", &timeline).unwrap();
        assert_eq!(segments, vec![Segment::new("f", 0.0, 1.0)]);
    }

    #[test]
    fn test_all_silence_no_segments() {
        let builder = SegmentBuilder::new(0.25, 0.5).unwrap();
        let timeline = ActivityTimeline::from_probabilities(&[0.1; 10], 0.1, 1.0);
        assert!(builder.build("f", &timeline).unwrap().is_empty());
    }

    #[test]
    fn test_empty_timeline() {
        let builder = SegmentBuilder::new(0.25, 0.5).unwrap();
        let timeline = ActivityTimeline::new(vec![], 10.0);
        assert!(builder.build("f", &timeline).unwrap().is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let builder = SegmentBuilder::new(0.25, 0.0).unwrap();
        let timeline = ActivityTimeline::from_probabilities(&[0.25, 0.2], 1.0, 2.0);
        let segments = builder.build("f", &timeline).unwrap();
        assert_eq!(segments, vec![Segment::new("f", 0.0, 1.0)]);
    }

    #[test]
    fn test_clips_to_file_bounds() {
        let builder = SegmentBuilder::new(0.25, 0.0).unwrap();
        let timeline = ActivityTimeline::new(
            vec![
                ActivityFrame::new(-0.5, 0.9),
                ActivityFrame::new(1.0, 0.1),
                ActivityFrame::new(2.5, 0.9),
                ActivityFrame::new(3.5, 0.9),
            ],
            3.0,
        );
        let segments = builder.build("f", &timeline).unwrap();
        assert_eq!(
            segments,
            vec![Segment::new("f", 0.0, 1.0), Segment::new("f", 2.5, 3.0)]
        );
    }

    #[test]
    fn test_invalid_timeline_is_reported() {
        let builder = SegmentBuilder::new(0.25, 0.0).unwrap();
        let timeline = flags(&[(1.0, true), (0.5, false)], 3.0);
        assert!(matches!(
            builder.build("f", &timeline),
            Err(Error::InvalidTimeline { .. })
        ));
    }
}
