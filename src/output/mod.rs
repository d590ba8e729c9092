//! Output writers: segment tables, reports, histogram and status lists.

mod histogram;
mod parquet_table;
pub mod progress;
mod report;
mod status;
mod table;

pub use histogram::{
    Histogram, HistogramBucket, HistogramRenderer, TextHistogramRenderer, write_histogram_csv,
};
pub use parquet_table::ParquetSegmentWriter;
pub use report::{ReportData, ReportDocument, RunSettings, write_text_report};
pub use status::StatusListWriter;
pub use table::{
    CsvSegmentWriter, SegmentTableWriter, TableRow, read_segment_table, read_segment_tables,
};
