//! Project-wide constants used across multiple modules.

/// Spinner animation characters for progress indicators
pub const SPINNER_CHARS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Directories to skip during file system traversal
pub const SKIP_DIRECTORIES: &[&str] = &["node_modules", ".git"];

/// Media file extensions VirtualDJ keeps cue points for
pub const MEDIA_EXTENSIONS: &[&str] = &["mp3", "mp4", "flac"];

/// Catalog file name, both in the VirtualDJ folder and in the shared repository
pub const CATALOG_FILE_NAME: &str = "database.xml";

/// VirtualDJ's folder, under a volume root on Windows or under ~/Documents elsewhere
pub const VIRTUALDJ_DIR: &str = "VirtualDJ";

pub const MEMO_FILE_NAME: &str = "memo.json";

pub const DEFAULT_REMOTE: &str = "origin";

pub const DEFAULT_BRANCH: &str = "master";
