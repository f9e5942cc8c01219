//! Song identity across catalogs.
//!
//! Catalogs on different machines rarely agree on where a file lives, so songs
//! are joined on the file's base name and byte size. Two distinct files that
//! happen to share both are treated as the same song; nothing here can tell
//! them apart.

use std::fmt;

/// Join key for songs: byte size and base file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the identity key for a base file name and size.
///
/// `name` must already be a base name; pass paths through [`base_name`] first.
pub fn identity_hash(name: &str, size: u64) -> IdentityKey {
    IdentityKey(format!("{size}_{name}"))
}

/// Path string conventions that can appear in a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSyntax {
    Windows,
    Posix,
}

impl PathSyntax {
    /// Any backslash marks the path as Windows-style.
    pub fn detect(path: &str) -> Self {
        if path.contains('\\') {
            PathSyntax::Windows
        } else {
            PathSyntax::Posix
        }
    }

    fn is_separator(self, c: char) -> bool {
        match self {
            PathSyntax::Windows => c == '\\' || c == '/',
            PathSyntax::Posix => c == '/',
        }
    }
}

/// Final component of `path`, whatever platform wrote it.
pub fn base_name(path: &str) -> &str {
    base_name_with(path, PathSyntax::detect(path))
}

/// Final component of `path` parsed with an explicit syntax.
pub fn base_name_with(path: &str, syntax: PathSyntax) -> &str {
    let trimmed = path.trim_end_matches(|c| syntax.is_separator(c));
    let last = match trimmed.rfind(|c| syntax.is_separator(c)) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    };

    // "C:track.mp3" is drive-relative; the drive is not part of the name
    if syntax == PathSyntax::Windows && has_drive_prefix(last) {
        &last[2..]
    } else {
        last
    }
}

fn has_drive_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
