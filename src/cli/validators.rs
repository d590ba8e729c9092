//! CLI argument validators.
//!
//! Shared validation functions for CLI argument parsing.

use crate::constants::MAX_JOBS;

/// Parse an activity threshold, which must lie strictly between 0 and 1.
pub fn parse_threshold(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(value > 0.0 && value < 1.0) {
        return Err(format!(
            "threshold must be between 0.0 and 1.0 (exclusive), got {value}"
        ));
    }

    Ok(value)
}

/// Parse a minimum segment duration in seconds (finite, non-negative).
pub fn parse_min_duration(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() || value < 0.0 {
        return Err(format!(
            "minimum duration must be a non-negative number of seconds, got {value}"
        ));
    }

    Ok(value)
}

/// Parse a worker thread count.
pub fn parse_jobs(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid thread count"))?;

    if value == 0 || value > MAX_JOBS {
        return Err(format!("jobs must be between 1 and {MAX_JOBS}, got {value}"));
    }

    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_threshold_valid() {
        assert_eq!(parse_threshold("0.5").ok(), Some(0.5));
        assert_eq!(parse_threshold("0.01").ok(), Some(0.01));
    }

    #[test]
    fn test_parse_threshold_rejects_bounds() {
        assert!(parse_threshold("0").is_err());
        assert!(parse_threshold("1.0").is_err());
        assert!(parse_threshold("-0.1").is_err());
        assert!(parse_threshold("NaN").is_err());
        assert!(parse_threshold("abc").unwrap_err().contains("not a valid number"));
    }

    #[test]
    fn test_parse_min_duration() {
        assert_eq!(parse_min_duration("0").ok(), Some(0.0));
        assert_eq!(parse_min_duration("1.25").ok(), Some(1.25));
        assert!(parse_min_duration("-1").is_err());
        assert!(parse_min_duration("inf").is_err());
    }

    #[test]
    fn test_parse_jobs() {
        assert_eq!(parse_jobs("4").ok(), Some(4));
        assert!(parse_jobs("0").is_err());
        assert!(parse_jobs("100000").is_err());
        assert!(parse_jobs("two").is_err());
    }
}
