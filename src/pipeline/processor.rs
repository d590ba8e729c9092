//! Single file processing pipeline.

use crate::audio::{decode_audio_file, probe_duration};
use crate::detect::SpeechDetector;
use crate::error::Error;
use crate::export::SegmentExporter;
use crate::pipeline::coordinator::InputFile;
use crate::pipeline::outcome::{ExportFailure, FileOutcome};
use crate::segment::SegmentBuilder;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Process a single audio file into a [`FileOutcome`].
///
/// Per-file failures never propagate: a file that cannot be decoded,
/// whose detector fails, or whose timeline is malformed is classified as
/// an error and the batch carries on.
///
/// # Arguments
///
/// * `input` - The audio file and its reported name
/// * `detector` - Source of the activity timeline
/// * `builder` - Segmentation settings
/// * `exporter` - Writes per-segment audio when export is enabled
pub fn process_file(
    input: &InputFile,
    detector: &dyn SpeechDetector,
    builder: &SegmentBuilder,
    exporter: Option<&dyn SegmentExporter>,
) -> FileOutcome {
    let start_time = Instant::now();
    let input_path = input.path.as_path();
    info!("Processing: {}", input_path.display());

    let decoded = match decode_audio_file(input_path) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("Skipping {}: {e}", input_path.display());
            let duration = duration_after_decode_failure(input_path, &e);
            return FileOutcome::failed(input, duration, &e);
        }
    };
    let duration = decoded.duration_secs;
    debug!(
        "Decoded {:.2}s at {} Hz from {}",
        duration,
        decoded.sample_rate,
        input_path.display()
    );

    let timeline = match detector.detect(input_path, &decoded) {
        Ok(timeline) => timeline,
        Err(e) => {
            warn!("{} detector failed on {}: {e}", detector.name(), input_path.display());
            return FileOutcome::failed(input, Some(duration), &e);
        }
    };

    let file_id = input.file_id();
    let segments = match builder.build(&file_id, &timeline) {
        Ok(segments) => segments,
        Err(e) => {
            warn!("Cannot segment {}: {e}", input_path.display());
            return FileOutcome::failed(input, Some(duration), &e);
        }
    };

    let mut outcome = FileOutcome::segmented(input, duration, segments);

    if let Some(exporter) = exporter {
        for segment in &outcome.segments {
            if let Err(e) = exporter.export(&decoded, segment) {
                warn!("Segment export failed: {e}");
                outcome.export_failures.push(ExportFailure {
                    segment_id: segment.segment_id(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "{}: {} ({} segment(s), {:.2}s speech of {:.2}s) in {:.2}s",
        outcome.name,
        outcome.status,
        outcome.segments.len(),
        outcome.speech_duration(),
        duration,
        start_time.elapsed().as_secs_f64()
    );

    outcome
}

/// Duration of a file whose audio could not be decoded.
///
/// When the container opened but its packets failed to decode, the header
/// still declares the length; open failures leave it unknown.
fn duration_after_decode_failure(path: &Path, error: &Error) -> Option<f64> {
    if !error.is_decode_error() {
        return None;
    }
    match probe_duration(path) {
        Ok(duration) => Some(duration),
        Err(e) => {
            debug!("No duration for {}: {e}", path.display());
            None
        }
    }
}
