//! Concurrent loading of many Parquet files

use std::path::{Path, PathBuf};

use arrow::record_batch::RecordBatch;
use futures::stream::{self, StreamExt};
use itertools::Itertools;

use super::batch_ops::read_parquet_async;
use super::file_ops::find_parquet_files_async;
use crate::config::ReaderConfig;
use crate::error::Result;
use crate::table::Table;
use crate::utils::logging::{create_file_progress_bar, finish_progress_bar};

/// Read several Parquet files with up to one file per CPU in flight
///
/// Batches are returned in the order of `paths`, whatever order the reads
/// finish in.
pub async fn load_parquet_files_async(
    paths: &[PathBuf],
    config: &ReaderConfig,
) -> Result<Vec<RecordBatch>> {
    let pb = create_file_progress_bar(paths.len() as u64);
    let progress = &pb;
    let mut results = stream::iter(paths.iter().enumerate())
        .map(|(i, path)| async move {
            let result = read_parquet_async(path, config).await;
            progress.inc(1);
            (i, result)
        })
        .buffer_unordered(num_cpus::get())
        .collect::<Vec<_>>()
        .await;
    finish_progress_bar(&pb, None);
    results.sort_by_key(|(i, _)| *i);

    let batches = results
        .into_iter()
        .map(|(i, result)| {
            result.inspect_err(|e| {
                log::error!("Error loading parquet file {}: {e}", paths[i].display());
            })
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect_vec();

    log::info!(
        "Loaded {} batches from {} parquet files",
        batches.len(),
        paths.len()
    );
    Ok(batches)
}

/// Load every Parquet file of a directory into one table
pub async fn load_parquet_dir_async(dir: &Path, config: &ReaderConfig) -> Result<Table> {
    let paths = find_parquet_files_async(dir).await?;
    let batches = load_parquet_files_async(&paths, config).await?;
    Table::from_batches(&batches)
}
