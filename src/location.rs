//! Where VirtualDJ keeps its catalog.
//!
//! On Windows every volume carries its own `VirtualDJ\database.xml` at the
//! volume root, so the catalog for a music folder depends on the drive the
//! folder lives on. Everywhere else there is one catalog under
//! `~/Documents/VirtualDJ`.

use crate::constants::{CATALOG_FILE_NAME, VIRTUALDJ_DIR};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Default catalog location for music stored under `root`.
pub fn default_catalog_path(platform: Platform, root: &Path, home: Option<&Path>) -> Result<PathBuf> {
    match platform {
        Platform::Windows => {
            let volume = windows_volume_root(&root.to_string_lossy());
            Ok(PathBuf::from(format!(
                "{volume}{VIRTUALDJ_DIR}\\{CATALOG_FILE_NAME}"
            )))
        }
        Platform::Unix => {
            let home = home.ok_or_else(|| {
                Error::Config("Unable to find home directory for the catalog".to_string())
            })?;
            Ok(home
                .join("Documents")
                .join(VIRTUALDJ_DIR)
                .join(CATALOG_FILE_NAME))
        }
    }
}

/// Volume root of a Windows path, always ending in a backslash.
///
/// `D:\Music\House` gives `D:\`, `\\server\share\Music` gives
/// `\\server\share\`, a rooted path without drive gives `\`.
pub fn windows_volume_root(path: &str) -> String {
    let normalized = path.replace('/', "\\");

    if let Some(unc) = normalized.strip_prefix("\\\\") {
        let mut parts = unc.split('\\').filter(|p| !p.is_empty());
        if let (Some(server), Some(share)) = (parts.next(), parts.next()) {
            return format!("\\\\{server}\\{share}\\");
        }
    }

    let bytes = normalized.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return format!("{}\\", &normalized[..2]);
    }

    "\\".to_string()
}
