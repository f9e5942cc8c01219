//! In-memory model of a VirtualDJ song catalog.
//!
//! A catalog is an ordered list of songs. Each song carries its location and
//! size, an open attribute set, the `Tags`, `Infos` and `Scan` singletons, its
//! points of interest (cues, loops, beat grid markers) and any other child
//! elements, kept verbatim so they survive a load/merge/save cycle.

mod bag;
pub mod xml;

pub use bag::AttributeBag;

use crate::identity::{IdentityKey, base_name, identity_hash};
use std::path::Path;

pub const SONG_ELEMENT: &str = "Song";
pub const POI_ELEMENT: &str = "Poi";
pub const TAGS_ELEMENT: &str = "Tags";
pub const INFOS_ELEMENT: &str = "Infos";
pub const SCAN_ELEMENT: &str = "Scan";
pub const FILE_PATH_ATTR: &str = "FilePath";
pub const FILE_SIZE_ATTR: &str = "FileSize";
pub const DEFAULT_ROOT_ELEMENT: &str = "VirtualDJ_Database";

/// A point of interest inside a song: cue, loop, marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Poi {
    pub attrs: AttributeBag,
}

impl Poi {
    pub fn new(attrs: AttributeBag) -> Self {
        Self { attrs }
    }

    /// Category tag, e.g. "cue", "loop", "beatgrid".
    pub fn kind(&self) -> Option<&str> {
        self.attrs.get("Type")
    }

    pub fn name(&self) -> Option<&str> {
        self.attrs.get("Name")
    }

    pub fn pos(&self) -> Option<&str> {
        self.attrs.get("Pos")
    }

    /// Cue slot number, if the point occupies one.
    pub fn num(&self) -> Option<&str> {
        self.attrs.get("Num").filter(|n| !n.is_empty())
    }

    pub fn clear_num(&mut self) {
        self.attrs.remove("Num");
    }
}

/// Child element the merge logic does not interpret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: AttributeBag,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongRecord {
    pub file_path: String,
    pub file_size: Option<u64>,
    /// Song attributes other than `FilePath` and `FileSize`
    pub attrs: AttributeBag,
    pub tags: Option<AttributeBag>,
    pub infos: Option<AttributeBag>,
    pub scan: Option<AttributeBag>,
    pub points: Vec<Poi>,
    pub extra: Vec<Element>,
}

impl SongRecord {
    pub fn new(file_path: impl Into<String>, file_size: u64) -> Self {
        Self {
            file_path: file_path.into(),
            file_size: Some(file_size),
            ..Default::default()
        }
    }

    pub fn base_name(&self) -> &str {
        base_name(&self.file_path)
    }

    /// A song without a recorded size keys as size 0.
    pub fn identity_key(&self) -> IdentityKey {
        identity_hash(self.base_name(), self.file_size.unwrap_or(0))
    }

    /// Same base file name and same size.
    pub fn matches(&self, other: &SongRecord) -> bool {
        self.file_size.unwrap_or(0) == other.file_size.unwrap_or(0)
            && self.base_name() == other.base_name()
    }

    pub fn is_under(&self, root: &Path) -> bool {
        Path::new(&self.file_path).starts_with(root)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub root_name: String,
    pub root_attrs: AttributeBag,
    pub songs: Vec<SongRecord>,
    /// Non-song children of the root element
    pub extra: Vec<Element>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_ELEMENT.to_string(),
            root_attrs: AttributeBag::new(),
            songs: Vec::new(),
            extra: Vec::new(),
        }
    }
}

impl Catalog {
    pub fn new(songs: Vec<SongRecord>) -> Self {
        Self {
            songs,
            ..Default::default()
        }
    }

    /// Same root element and non-song content, different songs.
    pub fn with_songs(&self, songs: Vec<SongRecord>) -> Catalog {
        Catalog {
            root_name: self.root_name.clone(),
            root_attrs: self.root_attrs.clone(),
            songs,
            extra: self.extra.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}
