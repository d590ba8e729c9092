//! Rebuild file outcomes from previously written segment tables.

use crate::audio::probe_duration;
use crate::output::TableRow;
use crate::pipeline::coordinator::InputFile;
use crate::pipeline::outcome::FileOutcome;
use crate::segment::Segment;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Pair every audio file with its rows from the segment table.
///
/// Files are matched to rows by their name relative to the input
/// directory. A file with rows is processed; a file without rows is an
/// error when `errors` lists it and `NoSpeech` otherwise. Files whose
/// duration cannot be read become errors. Rows naming a file that is not
/// part of `files` are ignored with a warning.
pub fn outcomes_from_table(
    files: &[InputFile],
    rows: &[TableRow],
    errors: &HashMap<String, String>,
) -> Vec<FileOutcome> {
    let mut by_file: HashMap<&str, Vec<&TableRow>> = HashMap::new();
    for row in rows {
        by_file.entry(row.filename.as_str()).or_default().push(row);
    }

    let outcomes = files
        .iter()
        .map(|input| {
            let name = input.name.as_str();
            let file_rows = by_file.remove(name).unwrap_or_default();
            let duration = probe_duration(&input.path);

            if file_rows.is_empty()
                && let Some(message) = errors.get(name)
            {
                debug!("{name}: failed in an earlier run");
                return FileOutcome::failed_with_message(input, duration.ok(), message.clone());
            }

            let duration = match duration {
                Ok(duration) => duration,
                Err(e) => {
                    warn!("Cannot read duration of {}: {e}", input.path.display());
                    return FileOutcome::failed(input, None, &e);
                }
            };

            let file_id = input.file_id();
            let mut segments: Vec<Segment> = file_rows
                .iter()
                .map(|row| Segment::new(file_id.as_str(), row.start, row.end))
                .collect();
            segments.sort_by(|a, b| a.start.total_cmp(&b.start));

            if let Some(last) = segments.last()
                && last.end > duration + 1e-3
            {
                warn!(
                    "{name}: segment ends at {:.3}s beyond the {duration:.3}s of audio",
                    last.end
                );
            }

            debug!("{name}: {} segment(s) from table", segments.len());
            FileOutcome::segmented(input, duration, segments)
        })
        .collect();

    for (name, rows) in by_file {
        warn!(
            "Segment table lists {} segment(s) for '{name}', which is not in the corpus",
            rows.len()
        );
    }

    outcomes
}
