//! Utility functions for error handling
//!
//! Guards used by the indicator operations before they touch the data.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{IndicatorError, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.is_file() {
        return Err(IndicatorError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a readable file (needed for {purpose})", path.display()),
        )));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => "permission denied".to_string(),
            _ => format!("failed to open file for {purpose}"),
        };
        IndicatorError::Io(io::Error::new(
            e.kind(),
            format!("{}: {context}: {e}", path.display()),
        ))
    })
}

/// Divide two counts and scale to a percentage
///
/// # Errors
/// Arithmetic error when `denominator` is zero
pub fn percentage(numerator: usize, denominator: usize, what: &str) -> Result<f64> {
    if denominator == 0 {
        return Err(IndicatorError::arithmetic(format!(
            "zero denominator while computing {what}"
        )));
    }
    Ok(numerator as f64 / denominator as f64 * 100.0)
}
