//! Parquet segment table writer.
//!
//! Same columns as the CSV table, stored with proper types so the table can
//! be loaded straight into dataframe tooling.

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::{WriterProperties, WriterVersion};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::constants::table::PARQUET_BATCH_ROWS;
use crate::error::{Error, Result};
use crate::output::table::{SegmentTableWriter, TableRow};

/// Parquet writer for segment rows.
///
/// Buffers rows and writes them in record batches.
pub struct ParquetSegmentWriter {
    writer: Option<ArrowWriter<File>>,
    schema: Arc<Schema>,
    rows: Vec<TableRow>,
    batch_size: usize,
}

impl ParquetSegmentWriter {
    /// Create a new Parquet writer.
    ///
    /// # Errors
    ///
    /// Returns error if file creation or writer initialization fails.
    pub fn new(output_path: &Path) -> Result<Self> {
        let schema = build_schema();
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .set_writer_version(WriterVersion::PARQUET_2_0)
            .build();

        let file = File::create(output_path).map_err(|e| Error::ParquetFileCreate {
            path: output_path.to_path_buf(),
            source: e,
        })?;

        let writer = ArrowWriter::try_new(file, schema.clone(), Some(props)).map_err(|e| {
            Error::ParquetWrite {
                context: "Failed to initialize Parquet writer".to_string(),
                source: e,
            }
        })?;

        Ok(Self {
            writer: Some(writer),
            schema,
            rows: Vec::new(),
            batch_size: PARQUET_BATCH_ROWS,
        })
    }

    fn flush_batch(&mut self) -> Result<()> {
        if self.rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.writer.as_mut() else {
            return Err(Error::Internal {
                message: "Parquet writer used after finalize".to_string(),
            });
        };

        let batch = build_record_batch(&self.rows, &self.schema)?;
        writer.write(&batch).map_err(|e| Error::ParquetWrite {
            context: "Failed to write Parquet record batch".to_string(),
            source: e,
        })?;
        self.rows.clear();

        Ok(())
    }
}

impl SegmentTableWriter for ParquetSegmentWriter {
    fn write_header(&mut self) -> Result<()> {
        // Schema is embedded in the file footer.
        Ok(())
    }

    fn write_row(&mut self, row: &TableRow) -> Result<()> {
        self.rows.push(row.clone());
        if self.rows.len() >= self.batch_size {
            self.flush_batch()?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.flush_batch()?;
        if let Some(writer) = self.writer.take() {
            writer.close().map_err(|e| Error::ParquetWrite {
                context: "Failed to close Parquet writer".to_string(),
                source: e,
            })?;
        }
        Ok(())
    }
}

fn build_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("filename", DataType::Utf8, false),
        Field::new("segment_id", DataType::Utf8, false),
        Field::new("start", DataType::Float64, false),
        Field::new("end", DataType::Float64, false),
        Field::new("duration", DataType::Float64, false),
    ]))
}

fn build_record_batch(rows: &[TableRow], schema: &Arc<Schema>) -> Result<RecordBatch> {
    let filenames: StringArray = rows.iter().map(|r| Some(r.filename.as_str())).collect();
    let segment_ids: StringArray = rows.iter().map(|r| Some(r.segment_id.as_str())).collect();
    let starts: Float64Array = rows.iter().map(|r| r.start).collect();
    let ends: Float64Array = rows.iter().map(|r| r.end).collect();
    let durations: Float64Array = rows.iter().map(|r| r.duration).collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(filenames),
        Arc::new(segment_ids),
        Arc::new(starts),
        Arc::new(ends),
        Arc::new(durations),
    ];

    RecordBatch::try_new(schema.clone(), columns).map_err(|e| Error::ArrowBatch { source: e })
}
