//! Async reading of a single Parquet file

use std::path::Path;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use futures::TryStreamExt;
use parquet::arrow::async_reader::ParquetRecordBatchStreamBuilder;

use super::file_ops::open_parquet_file_async;
use crate::config::ReaderConfig;
use crate::error::Result;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Stream every record batch of a Parquet file
pub async fn read_parquet_async(path: &Path, config: &ReaderConfig) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();
    log_operation_start("Reading parquet file asynchronously", path);

    let file = open_parquet_file_async(path).await?;
    let stream = ParquetRecordBatchStreamBuilder::new(file)
        .await?
        .with_batch_size(config.batch_size)
        .build()?;
    let batches = stream.try_collect::<Vec<_>>().await?;

    let rows = batches.iter().map(RecordBatch::num_rows).sum();
    log_operation_complete("Read", path, rows, start.elapsed());
    Ok(batches)
}
