//! Start/complete/warning log lines shared by the readers

use std::path::Path;
use std::time::Duration;

/// Log the start of an operation on a file or directory
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{operation} {}", path.display());
}

/// Log a finished operation with the number of rows it produced
pub fn log_operation_complete(operation: &str, path: &Path, rows: usize, elapsed: Duration) {
    log::info!(
        "{operation} {}: {rows} rows in {elapsed:?}",
        path.display()
    );
}

/// Log a warning, optionally about a specific path
pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{message}: {}", path.display()),
        None => log::warn!("{message}"),
    }
}
