//! Configuration validation.

use crate::config::{Config, DetectorConfig};
use crate::constants::{MAX_JOBS, SUPPORTED_AUDIO_EXTENSIONS};
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    let defaults = &config.defaults;
    validate_settings(defaults.threshold, defaults.min_duration, defaults.jobs)?;
    validate_extensions(&defaults.extensions)?;
    validate_detector(&config.detector)?;
    Ok(())
}

/// Validate the effective segmentation settings after CLI overrides.
pub fn validate_settings(threshold: f32, min_duration: f64, jobs: usize) -> Result<()> {
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

    if jobs == 0 || jobs > MAX_JOBS {
        return Err(Error::ConfigValidation {
            message: format!("jobs must be between 1 and {MAX_JOBS}, got {jobs}"),
        });
    }

    Ok(())
}

fn validate_extensions(extensions: &[String]) -> Result<()> {
    if extensions.is_empty() {
        return Err(Error::ConfigValidation {
            message: "at least one audio extension is required".to_string(),
        });
    }

    if let Some(unsupported) = extensions
        .iter()
        .find(|ext| !SUPPORTED_AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
    {
        return Err(Error::ConfigValidation {
            message: format!(
                "unsupported audio extension '{unsupported}' (supported: {})",
                SUPPORTED_AUDIO_EXTENSIONS.join(", ")
            ),
        });
    }

    Ok(())
}

fn validate_detector(detector: &DetectorConfig) -> Result<()> {
    if detector.frame_ms == 0 {
        return Err(Error::ConfigValidation {
            message: "detector.frame_ms must be at least 1".to_string(),
        });
    }

    if !(detector.floor_db.is_finite()
        && detector.ceiling_db.is_finite()
        && detector.floor_db < detector.ceiling_db)
    {
        return Err(Error::ConfigValidation {
            message: format!(
                "detector.floor_db ({}) must be below detector.ceiling_db ({})",
                detector.floor_db, detector.ceiling_db
            ),
        });
    }

    Ok(())
}
