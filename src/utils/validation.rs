//! Path and input validation utilities.

use owo_colors::OwoColorize;
use std::error::Error;
use std::path::Path;

/// Validate that `path` is an existing directory.
///
/// # Returns
///
/// * `Ok(())` if the path is a directory
/// * `Err` with a formatted error message otherwise
pub fn validate_directory(path: &Path) -> Result<(), Box<dyn Error>> {
    if !path.exists() {
        return Err(format!(
            "{} Path does not exist: {}",
            "Error:".red().bold(),
            path.display()
        )
        .into());
    }
    if !path.is_dir() {
        return Err(format!(
            "{} Not a directory: {}",
            "Error:".red().bold(),
            path.display()
        )
        .into());
    }
    Ok(())
}
