//! Processing pipeline components.

mod batch;
mod coordinator;
mod outcome;
mod processor;
mod rebuild;

pub use batch::{BatchContext, BatchRun, run_batch};
pub use coordinator::{InputFile, apply_exclusions, collect_input_files};
pub use outcome::{ExportFailure, FileOutcome, FileStatus};
pub use processor::process_file;
pub use rebuild::outcomes_from_table;
