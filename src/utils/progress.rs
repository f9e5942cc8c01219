//! Spinner for long-running commands.

use crate::constants::SPINNER_CHARS;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a cyan spinner that ticks on its own until finished.
///
/// # Example
///
/// ```ignore
/// use cuesync::utils::progress::create_progress_spinner;
///
/// let spinner = create_progress_spinner("Scanning music folder...");
/// // ... do work ...
/// spinner.finish_and_clear();
/// ```
pub fn create_progress_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_strings(SPINNER_CHARS),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
