//! Population-diversity indicators over a merged organization, job, person
//! and degree table.
//!
//! Load a [`Table`] once with the readers, build a [`DiversityIndicators`]
//! engine over it and call any indicator in any order.

pub mod async_io;
pub mod config;
pub mod error;
pub mod filter;
pub mod indicators;
pub mod prepare;
pub mod reader;
pub mod table;
pub mod utils;

// Core types
pub use config::{IndicatorConfig, ReaderConfig, RunConfig};
pub use error::{IndicatorError, Result};
pub use indicators::{
    DegreeScope, DiversityIndicators, GroupKeys, LiebersonFormat, Location, Normalization,
    PartitionScope, PartitionScores, RankedLocation, ShareTable, lieberson_index,
};
pub use table::{InputRecord, Table};

// Filtering
pub use filter::{Expr, evaluate_expr, filter_record_batch};

// Loading and preparation
pub use async_io::load_parquet_dir_async;
pub use prepare::{PreparationConfig, prepare_table};
pub use reader::{read_csv, read_parquet, read_table};

// Arrow types
pub use arrow::record_batch::RecordBatch;
