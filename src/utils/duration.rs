//! Duration formatting.

/// Format whole seconds as `H hours, M minutes, S seconds`.
///
/// Fractional seconds are truncated; negative and non-finite input is
/// treated as zero.
pub fn human_readable_duration(seconds: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours} hours, {minutes} minutes, {secs} seconds")
}
