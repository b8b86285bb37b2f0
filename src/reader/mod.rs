//! Synchronous table readers
//!
//! CSV input is read with every column as nullable text, so identifiers and
//! flags keep their original spelling until [`Table`] normalizes them.
//! Parquet input keeps its physical types and is cast on table construction.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::record_batch::RecordBatch;
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rayon::prelude::*;

use crate::config::ReaderConfig;
use crate::error::util::safe_open_file;
use crate::error::{IndicatorError, Result};
use crate::table::Table;
use crate::utils::find_files_with_extension;
use crate::utils::logging::{
    create_file_progress_bar, finish_progress_bar, log_operation_complete, log_operation_start,
    log_warning,
};

/// Input formats recognised by [`read_table`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Parquet,
    ParquetDirectory,
}

impl InputFormat {
    /// Detect the format from a path
    ///
    /// # Errors
    /// Invalid argument for anything other than `.csv`, `.parquet` or a directory
    pub fn detect(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(Self::ParquetDirectory);
        }
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("parquet") => Ok(Self::Parquet),
            _ => Err(IndicatorError::invalid_argument(format!(
                "unsupported input {}, expected a .csv file, a .parquet file or a directory",
                path.display()
            ))),
        }
    }
}

/// Read a CSV file with every column as nullable text
pub fn read_csv(path: &Path, config: &ReaderConfig) -> Result<Table> {
    let start = Instant::now();
    log_operation_start("Reading CSV file", path);

    let format = Format::default()
        .with_header(config.has_header)
        .with_delimiter(config.delimiter);
    let (inferred, _) = format.infer_schema(
        safe_open_file(path, "CSV input")?,
        config.infer_schema_records,
    )?;
    let schema = text_schema(&inferred);

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(config.has_header)
        .with_delimiter(config.delimiter)
        .with_batch_size(config.batch_size)
        .build(safe_open_file(path, "CSV input")?)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    let table = table_or_empty(&batches, schema)?;
    log_operation_complete("Read CSV file", path, table.num_rows(), start.elapsed());
    Ok(table)
}

/// Read every record batch of one Parquet file
pub fn read_parquet_batches(path: &Path, config: &ReaderConfig) -> Result<Vec<RecordBatch>> {
    let file = safe_open_file(path, "parquet input")?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(config.batch_size)
        .build()?;
    Ok(reader.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Read one Parquet file into a table
pub fn read_parquet(path: &Path, config: &ReaderConfig) -> Result<Table> {
    let start = Instant::now();
    log_operation_start("Reading parquet file", path);

    let schema = ParquetRecordBatchReaderBuilder::try_new(safe_open_file(path, "parquet input")?)?
        .schema()
        .clone();
    let batches = read_parquet_batches(path, config)?;

    let table = table_or_empty(&batches, schema)?;
    log_operation_complete("Read parquet file", path, table.num_rows(), start.elapsed());
    Ok(table)
}

/// Read several Parquet files on the rayon pool, keeping the order of `paths`
pub fn load_parquet_files_parallel(
    paths: &[PathBuf],
    config: &ReaderConfig,
) -> Result<Vec<RecordBatch>> {
    let pb = create_file_progress_bar(paths.len() as u64);
    let batches = paths
        .par_iter()
        .map(|path| {
            let batches = read_parquet_batches(path, config);
            pb.inc(1);
            batches
        })
        .collect::<Result<Vec<_>>>();
    finish_progress_bar(&pb, None);
    Ok(batches?.into_iter().flatten().collect())
}

/// Read every Parquet file of a directory into one table
pub fn read_parquet_dir(dir: &Path, config: &ReaderConfig) -> Result<Table> {
    let start = Instant::now();
    log_operation_start("Reading parquet directory", dir);

    let paths = find_files_with_extension(dir, "parquet")?;
    if paths.is_empty() {
        log_warning("No parquet files found in directory", Some(dir));
        return Err(IndicatorError::invalid_argument(format!(
            "no parquet files in {}",
            dir.display()
        )));
    }
    let batches = load_parquet_files_parallel(&paths, config)?;

    let table = Table::from_batches(&batches)?;
    log_operation_complete("Read parquet directory", dir, table.num_rows(), start.elapsed());
    Ok(table)
}

/// Read a CSV file, a Parquet file or a directory of Parquet files
pub fn read_table(path: &Path, config: &ReaderConfig) -> Result<Table> {
    match InputFormat::detect(path)? {
        InputFormat::Csv => read_csv(path, config),
        InputFormat::Parquet => read_parquet(path, config),
        InputFormat::ParquetDirectory => read_parquet_dir(path, config),
    }
}

/// The same column names, all nullable text
fn text_schema(schema: &Schema) -> SchemaRef {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|field| Field::new(field.name(), DataType::Utf8, true))
        .collect();
    Arc::new(Schema::new(fields))
}

fn table_or_empty(batches: &[RecordBatch], schema: SchemaRef) -> Result<Table> {
    if batches.is_empty() {
        return Table::new(&RecordBatch::new_empty(schema));
    }
    Table::from_batches(batches)
}
