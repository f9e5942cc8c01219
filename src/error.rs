//! Error types for cuesync.
//!
//! Every fatal condition of a run maps to one variant here. A run that hits
//! any of them stops before writing the catalog, the memo or the shared copy.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Two or more songs under the sync root share a file name and size
    #[error(
        "Duplicate songs under {}: {}. Run `cuesync cleandb` to collapse them",
        root.display(),
        describe_groups(groups)
    )]
    DuplicateSongs {
        root: PathBuf,
        groups: Vec<Vec<String>>,
    },

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog document that cannot be parsed or lacks required attributes
    #[error("Malformed catalog {origin}: {reason}")]
    MalformedCatalog { origin: String, reason: String },

    /// Memo file that is not a valid JSON song list
    #[error("Malformed memo: {0}")]
    Memo(#[from] serde_json::Error),

    /// git invocation on the shared catalog repository failed
    #[error("Version control command `{command}` failed: {stderr}")]
    VersionControl { command: String, stderr: String },

    /// Unresolvable paths or settings
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

fn describe_groups(groups: &[Vec<String>]) -> String {
    groups
        .iter()
        .map(|group| format!("[{}]", group.join(", ")))
        .collect::<Vec<_>>()
        .join(" ")
}
