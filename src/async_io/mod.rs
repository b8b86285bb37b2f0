//! Async Parquet loading with tokio
//!
//! Files are streamed with `ParquetRecordBatchStreamBuilder`; a directory is
//! loaded with up to one file in flight per CPU.

pub mod batch_ops;
pub mod file_ops;
pub mod parallel_ops;

pub use batch_ops::read_parquet_async;
pub use file_ops::{find_parquet_files_async, open_parquet_file_async};
pub use parallel_ops::{load_parquet_dir_async, load_parquet_files_async};
