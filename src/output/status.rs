//! Per-status file lists.
//!
//! Every file lands in exactly one list. Lists hold file names relative to
//! the input directory so they can be passed back with `--exclude`; error
//! lines append the message after a tab.

use crate::constants::output_files::{ERROR_LIST, PROCESSED_LIST, WARNING_LIST};
use crate::error::Result;
use crate::pipeline::{FileOutcome, FileStatus};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes `processed_files.log`, `warning_files.log` and `error_files.log`.
pub struct StatusListWriter {
    processed: BufWriter<File>,
    warnings: BufWriter<File>,
    errors: BufWriter<File>,
}

impl StatusListWriter {
    /// Create (truncate) the three lists in `output_dir`.
    pub fn new(output_dir: &Path) -> Result<Self> {
        let open = |name: &str| -> Result<BufWriter<File>> {
            Ok(BufWriter::new(File::create(output_dir.join(name))?))
        };

        Ok(Self {
            processed: open(PROCESSED_LIST)?,
            warnings: open(WARNING_LIST)?,
            errors: open(ERROR_LIST)?,
        })
    }

    /// Append one file to the list matching its status.
    pub fn record(&mut self, outcome: &FileOutcome) -> Result<()> {
        let name = &outcome.name;
        match &outcome.status {
            FileStatus::Processed => writeln!(self.processed, "{name}")?,
            FileStatus::NoSpeech => writeln!(self.warnings, "{name}")?,
            FileStatus::Error { message } => {
                writeln!(self.errors, "{name}\t{}", message.replace(['\n', '\t'], " "))?;
            }
        }
        Ok(())
    }

    /// Flush all lists.
    pub fn finalize(&mut self) -> Result<()> {
        self.processed.flush()?;
        self.warnings.flush()?;
        self.errors.flush()?;
        Ok(())
    }
}
