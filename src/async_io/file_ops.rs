//! Async directory listing and file opening

use std::path::{Path, PathBuf};

use tokio::fs::{self, File};

use crate::error::Result;
use crate::utils::logging::{log_operation_start, log_warning};
use crate::utils::validate_directory;

/// Parquet files directly inside `dir`, sorted by path
pub async fn find_parquet_files_async(dir: &Path) -> Result<Vec<PathBuf>> {
    log_operation_start("Searching for parquet files in", dir);
    validate_directory(dir)?;

    let mut parquet_files = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file()
            && path.extension().is_some_and(|ext| ext == "parquet")
        {
            parquet_files.push(path);
        }
    }

    if parquet_files.is_empty() {
        log_warning("No parquet files found in directory", Some(dir));
    }
    parquet_files.sort();
    Ok(parquet_files)
}

/// Open a file for async reading
pub async fn open_parquet_file_async(path: &Path) -> Result<File> {
    File::open(path).await.map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open parquet file {}: {e}", path.display()),
        )
        .into()
    })
}
