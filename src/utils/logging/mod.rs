//! Consistent log lines and progress indicators for table loading

pub mod log;
pub mod progress;

pub use log::{log_operation_complete, log_operation_start, log_warning};
pub use progress::{create_file_progress_bar, create_spinner, finish_progress_bar};
