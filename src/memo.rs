//! The memo: last observed state of every song on this machine.
//!
//! Stored as a JSON array of lightweight song entries next to the config. A
//! missing file is an empty memo; the file is rewritten whole after each sync.

use crate::catalog::{AttributeBag, Poi, SongRecord};
use crate::error::Result;
use crate::identity::{IdentityKey, base_name, identity_hash};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoEntry {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub cues: Vec<AttributeBag>,
}

impl MemoEntry {
    pub fn from_record(song: &SongRecord) -> Self {
        Self {
            name: song.base_name().to_string(),
            path: song.file_path.clone(),
            size: song.file_size,
            cues: song.points.iter().map(|p| p.attrs.clone()).collect(),
        }
    }

    pub fn to_record(&self) -> SongRecord {
        SongRecord {
            file_path: self.path.clone(),
            file_size: self.size,
            points: self.cues.iter().cloned().map(Poi::new).collect(),
            ..Default::default()
        }
    }

    /// Keyed on the stored path so a stale `name` cannot disagree with it.
    pub fn identity_key(&self) -> IdentityKey {
        identity_hash(base_name(&self.path), self.size.unwrap_or(0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Memo {
    pub entries: Vec<MemoEntry>,
}

impl Memo {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No memo at {}, starting empty", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let memo: Memo = serde_json::from_str(&contents)?;
        debug!("Loaded {} memo entries from {}", memo.len(), path.display());
        Ok(memo)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Saved memo: {} ({} entries)", path.display(), self.len());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
