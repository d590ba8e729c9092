//! Activity timeline produced by a speech detector.

use crate::error::{Error, Result};
use crate::segment::Segment;

/// One detector frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityFrame {
    /// Frame start time in seconds.
    pub time: f64,
    /// Speech probability (0.0 - 1.0).
    pub probability: f32,
}

impl ActivityFrame {
    /// Frame carrying a speech probability.
    pub const fn new(time: f64, probability: f32) -> Self {
        Self { time, probability }
    }

    /// Frame carrying a boolean speech decision.
    pub const fn from_flag(time: f64, is_speech: bool) -> Self {
        Self {
            time,
            probability: if is_speech { 1.0 } else { 0.0 },
        }
    }
}

/// Per-frame speech activity for one file.
///
/// Frame `i` covers `[frames[i].time, frames[i + 1].time)`; the last frame
/// extends to the end of the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityTimeline {
    frames: Vec<ActivityFrame>,
    duration: f64,
}

impl ActivityTimeline {
    /// Create a timeline from frames and the total file duration.
    ///
    /// No validation happens here; [`ActivityTimeline::validate`] reports
    /// malformed input.
    pub const fn new(frames: Vec<ActivityFrame>, duration: f64) -> Self {
        Self { frames, duration }
    }

    /// Build a timeline from evenly spaced probabilities.
    pub fn from_probabilities(probabilities: &[f32], frame_secs: f64, duration: f64) -> Self {
        let frames = probabilities
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                #[allow(clippy::cast_precision_loss)]
                let time = i as f64 * frame_secs;
                ActivityFrame::new(time, p)
            })
            .collect();
        Self::new(frames, duration)
    }

    /// Build a fully-active/fully-silent timeline from existing segments.
    pub fn from_segments(segments: &[Segment], duration: f64) -> Self {
        let mut frames = Vec::with_capacity(segments.len() * 2 + 1);

        if segments.first().is_none_or(|s| s.start > 0.0) && duration > 0.0 {
            frames.push(ActivityFrame::from_flag(0.0, false));
        }

        for (i, segment) in segments.iter().enumerate() {
            frames.push(ActivityFrame::from_flag(segment.start, true));
            let touches_next = segments.get(i + 1).is_some_and(|n| n.start <= segment.end);
            if segment.end < duration && !touches_next {
                frames.push(ActivityFrame::from_flag(segment.end, false));
            }
        }

        Self::new(frames, duration)
    }

    /// Frames in time order.
    pub fn frames(&self) -> &[ActivityFrame] {
        &self.frames
    }

    /// Total file duration in seconds.
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// Whether the timeline has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// End time of frame `index` (start of the next frame, or the file end).
    pub fn frame_end(&self, index: usize) -> f64 {
        self.frames
            .get(index + 1)
            .map_or(self.duration, |next| next.time)
    }

    /// Check the timeline is well formed.
    ///
    /// Timestamps must be finite and strictly increasing, probabilities must
    /// lie in `[0, 1]` and the duration must be finite and non-negative.
    /// Timestamps outside the file bounds are accepted; the builder clips them.
    pub fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(Error::InvalidTimeline {
                reason: format!("duration must be finite and non-negative, got {}", self.duration),
            });
        }

        let mut previous: Option<f64> = None;
        for (i, frame) in self.frames.iter().enumerate() {
            if !frame.time.is_finite() {
                return Err(Error::InvalidTimeline {
                    reason: format!("frame {i}: timestamp is not finite"),
                });
            }
            if !(0.0..=1.0).contains(&frame.probability) {
                return Err(Error::InvalidTimeline {
                    reason: format!(
                        "frame {i}: probability {} outside [0, 1]",
                        frame.probability
                    ),
                });
            }
            if let Some(prev) = previous
                && frame.time <= prev
            {
                return Err(Error::InvalidTimeline {
                    reason: format!(
                        "frame {i}: timestamp {} does not follow {prev}",
                        frame.time
                    ),
                });
            }
            previous = Some(frame.time);
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_probabilities_spacing() {
        let timeline = ActivityTimeline::from_probabilities(&[0.1, 0.9, 0.2], 0.5, 1.5);
        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.frames()[2].time, 1.0);
        assert_eq!(timeline.frame_end(0), 0.5);
        assert_eq!(timeline.frame_end(2), 1.5);
    }

    #[test]
    fn test_validate_rejects_unsorted() {
        let timeline = ActivityTimeline::new(
            vec![ActivityFrame::new(1.0, 0.5), ActivityFrame::new(0.5, 0.5)],
            2.0,
        );
        let err = timeline.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidTimeline { .. }));
    }

    #[test]
    fn test_validate_rejects_duplicate_timestamp() {
        let timeline = ActivityTimeline::new(
            vec![ActivityFrame::new(1.0, 0.5), ActivityFrame::new(1.0, 0.5)],
            2.0,
        );
        assert!(timeline.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan_probability() {
        let timeline = ActivityTimeline::new(vec![ActivityFrame::new(0.0, f32::NAN)], 1.0);
        assert!(timeline.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_duration() {
        let timeline = ActivityTimeline::new(vec![], -1.0);
        assert!(timeline.validate().is_err());
    }

    #[test]
    fn test_from_segments_marks_gaps() {
        let segments = vec![Segment::new("f", 1.0, 2.0), Segment::new("f", 3.0, 5.0)];
        let timeline = ActivityTimeline::from_segments(&segments, 5.0);
        let flags: Vec<(f64, f32)> = timeline
            .frames()
            .iter()
            .map(|f| (f.time, f.probability))
            .collect();
        assert_eq!(
            flags,
            vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0)]
        );
        assert!(timeline.validate().is_ok());
    }
}
