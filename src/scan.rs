//! Filesystem scan for media files.
//!
//! Subdirectories are walked in parallel with rayon, so files arrive in no
//! particular order. [`scan_media`] sorts the final list by path, which keeps
//! every later "last one wins" rule reproducible between runs.

use crate::constants::SKIP_DIRECTORIES;
use crate::error::Result;
use crate::identity::{IdentityKey, identity_hash};
use log::{debug, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// A media file found on disk, tagged with its identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub size: u64,
    pub hash: IdentityKey,
}

/// Check if a file or directory is hidden (starts with '.')
pub fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

pub fn should_skip_directory(name: &str) -> bool {
    SKIP_DIRECTORIES.contains(&name)
}

fn has_media_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
}

/// Scan `root` and describe every media file under it.
///
/// The returned list is complete and sorted by path.
pub fn scan_media(root: &Path, extensions: &[String]) -> Result<Vec<ScannedFile>> {
    let mut paths = collect_media_files(root, extensions)?;
    paths.sort();

    let files: Vec<ScannedFile> = paths
        .into_par_iter()
        .filter_map(|path| match fs::metadata(&path) {
            Ok(meta) => {
                let name = path.file_name()?.to_string_lossy().to_string();
                let size = meta.len();
                Some(ScannedFile {
                    hash: identity_hash(&name, size),
                    path,
                    size,
                })
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    debug!("Scanned {} media files under {}", files.len(), root.display());
    Ok(files)
}

/// Collect all files with one of `extensions` (no leading dot) under `dir`.
///
/// An unreadable `dir` is an error. Unreadable subdirectories are logged and
/// skipped so one bad folder does not hide the rest of the library.
pub fn collect_media_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut local_files = Vec::new();
    let mut directories = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if is_hidden_file(&path) {
            continue;
        }

        // Linked directories are never followed
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            if path.is_file() && has_media_extension(&path, extensions) {
                local_files.push(path);
            } else {
                debug!("Not following link {}", path.display());
            }
        } else if file_type.is_dir() {
            let dir_name = match path.file_name() {
                Some(name) => name.to_string_lossy(),
                None => continue,
            };
            if !should_skip_directory(&dir_name) {
                directories.push(path);
            }
        } else if file_type.is_file() && has_media_extension(&path, extensions) {
            local_files.push(path);
        }
    }

    let nested: Vec<Vec<PathBuf>> = if directories.len() > 1 {
        directories
            .par_iter()
            .filter_map(|subdir| scan_subdirectory(subdir, extensions))
            .collect()
    } else {
        directories
            .iter()
            .filter_map(|subdir| scan_subdirectory(subdir, extensions))
            .collect()
    };

    local_files.extend(nested.into_iter().flatten());
    Ok(local_files)
}

fn scan_subdirectory(subdir: &Path, extensions: &[String]) -> Option<Vec<PathBuf>> {
    match collect_media_files(subdir, extensions) {
        Ok(files) => Some(files),
        Err(e) => {
            warn!("Failed to scan directory '{}': {}", subdir.display(), e);
            None
        }
    }
}
