pub mod cleandb;
pub mod config;
pub mod init;
pub mod sync;

use cuesync::config::{Config, expand};
use cuesync::location::Platform;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Catalog path from the command line, else from the config.
pub(crate) fn catalog_path_for(
    root: &Path,
    catalog: Option<&str>,
    config: &Config,
) -> Result<PathBuf, Box<dyn Error>> {
    match catalog {
        Some(path) => Ok(expand(path)),
        None => config.resolve_catalog_path(root, Platform::current()),
    }
}

/// Absolute form of a user-supplied music folder, without resolving links.
pub(crate) fn absolute_root(root: &str) -> Result<PathBuf, Box<dyn Error>> {
    Ok(std::path::absolute(expand(root))?)
}
