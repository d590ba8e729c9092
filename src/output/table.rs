//! Flat segment table: one row per speech segment.
//!
//! Columns are `filename,segment_id,start,end,duration`. Times are written
//! with six fixed decimals and the duration is derived from the rounded
//! start and end, so a parsed row reproduces its own duration.

use crate::constants::table::{DECIMAL_PLACES, HEADER};
use crate::error::{Error, Result};
use crate::pipeline::FileOutcome;
use crate::segment::{Segment, round_to};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One row of the segment table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableRow {
    /// Audio file name relative to the input directory, with extension.
    pub filename: String,
    /// Segment identifier.
    pub segment_id: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl TableRow {
    /// Build the row for a segment, rounding times to the table precision.
    pub fn new(filename: &str, segment: &Segment) -> Self {
        let start = round_to(segment.start, DECIMAL_PLACES);
        let end = round_to(segment.end, DECIMAL_PLACES);
        Self {
            filename: filename.to_string(),
            segment_id: segment.segment_id(),
            start,
            end,
            duration: round_to(end - start, DECIMAL_PLACES),
        }
    }

    fn fields(&self) -> [String; 5] {
        #[allow(clippy::cast_sign_loss)]
        let prec = DECIMAL_PLACES as usize;
        [
            self.filename.clone(),
            self.segment_id.clone(),
            format!("{:.prec$}", self.start),
            format!("{:.prec$}", self.end),
            format!("{:.prec$}", self.duration),
        ]
    }
}

/// Sink for segment table rows.
pub trait SegmentTableWriter {
    /// Write the header (if the format has one).
    fn write_header(&mut self) -> Result<()>;

    /// Write a single row.
    fn write_row(&mut self, row: &TableRow) -> Result<()>;

    /// Flush and close the output.
    fn finalize(&mut self) -> Result<()>;

    /// Write every segment of a file outcome.
    fn write_outcome(&mut self, outcome: &FileOutcome) -> Result<()> {
        for segment in &outcome.segments {
            self.write_row(&TableRow::new(&outcome.name, segment))?;
        }
        Ok(())
    }
}

/// CSV segment table writer.
pub struct CsvSegmentWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl CsvSegmentWriter {
    /// Create the CSV file at `path`.
    pub fn new(path: &Path) -> Result<Self> {
        let writer = csv::Writer::from_path(path).map_err(|e| Error::CsvWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }

    fn csv_error(&self, source: csv::Error) -> Error {
        Error::CsvWrite {
            path: self.path.clone(),
            source,
        }
    }
}

impl SegmentTableWriter for CsvSegmentWriter {
    fn write_header(&mut self) -> Result<()> {
        self.writer
            .write_record(HEADER)
            .map_err(|e| self.csv_error(e))
    }

    fn write_row(&mut self, row: &TableRow) -> Result<()> {
        self.writer
            .write_record(row.fields())
            .map_err(|e| self.csv_error(e))
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Parse a segment table written by [`CsvSegmentWriter`].
///
/// Handles a UTF-8 BOM and surrounding whitespace. Rows with `end <= start`
/// are rejected; repeated rows are handled as in [`read_segment_tables`].
///
/// # Errors
///
/// Returns `Error::SegmentTableParse` when the file cannot be read or a row
/// cannot be decoded, and `Error::InvalidSegmentTable` for inconsistent rows.
pub fn read_segment_table(path: &Path) -> Result<Vec<TableRow>> {
    read_segment_tables(&[path.to_path_buf()])
}

/// Parse and concatenate the segment tables of several runs.
///
/// A row repeated with identical times, in one table or across tables, is
/// kept once. The same `segment_id` with different times for one file is an
/// error.
pub fn read_segment_tables(paths: &[PathBuf]) -> Result<Vec<TableRow>> {
    let mut rows: Vec<TableRow> = Vec::new();
    let mut seen: HashMap<(String, String), usize> = HashMap::new();
    let mut dropped = 0;

    for path in paths {
        for (line, row) in read_rows(path)? {
            let key = (row.filename.clone(), row.segment_id.clone());
            if let Some(&index) = seen.get(&key) {
                let kept = &rows[index];
                if (kept.start - row.start).abs() > 1e-9 || (kept.end - row.end).abs() > 1e-9 {
                    return Err(Error::InvalidSegmentTable {
                        message: format!(
                            "{} line {line}: segment_id '{}' for '{}' repeats with different times",
                            path.display(),
                            row.segment_id,
                            row.filename
                        ),
                    });
                }
                dropped += 1;
                continue;
            }
            seen.insert(key, rows.len());
            rows.push(row);
        }
    }

    if dropped > 0 {
        debug!("Dropped {dropped} repeated segment row(s)");
    }
    Ok(rows)
}

fn read_rows(path: &Path) -> Result<Vec<(usize, TableRow)>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::SegmentTableParse {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<TableRow>().enumerate() {
        let line = index + 2;
        let row = result.map_err(|e| Error::SegmentTableParse {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        if !(row.start.is_finite() && row.end.is_finite()) || row.end <= row.start {
            return Err(Error::InvalidSegmentTable {
                message: format!(
                    "line {line}: end ({}) must be greater than start ({})",
                    row.end, row.start
                ),
            });
        }

        if (row.duration - (row.end - row.start)).abs() > 1e-5 {
            warn!(
                "line {line}: duration {} does not match end - start ({})",
                row.duration,
                row.end - row.start
            );
        }

        rows.push((line, row));
    }

    Ok(rows)
}
