//! Segment type definitions.

use crate::constants::segment_id::DECIMAL_PLACES;

/// A contiguous interval of speech within one file.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Identifier of the source file (its stem).
    pub file_id: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

impl Segment {
    /// Create a new segment.
    pub fn new(file_id: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            file_id: file_id.into(),
            start,
            end,
        }
    }

    /// Segment duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Deterministic identifier: `{file_id}_{start}_{end}` with fixed decimals.
    ///
    /// Also used as the stem of exported clip files.
    pub fn segment_id(&self) -> String {
        format!(
            "{}_{:.prec$}_{:.prec$}",
            self.file_id,
            self.start,
            self.end,
            prec = DECIMAL_PLACES
        )
    }
}

/// Round a value to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_id_format() {
        let segment = Segment::new("interview_01", 1.0, 2.456);
        assert_eq!(segment.segment_id(), "interview_01_1.00_2.46");
    }

    #[test]
    fn test_segment_duration() {
        let segment = Segment::new("a", 1.5, 4.0);
        assert_eq!(segment.duration(), 2.5);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.234_567_89, 6), 1.234_568);
        assert_eq!(round_to(2.0, 6), 2.0);
    }
}
