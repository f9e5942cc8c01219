//! Catalog-level reconciliation.
//!
//! Songs are joined on their identity key, never on path. Reconciling two
//! catalogs keeps the primary's order and locations; rewriting paths against a
//! fresh scan is a separate, explicit step.

use crate::catalog::{Catalog, SongRecord};
use crate::identity::IdentityKey;
use crate::merge::merge_songs;
use crate::scan::ScannedFile;
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Merge `secondary` into `primary`.
///
/// Matched songs are merged with the secondary side winning attribute
/// conflicts but the primary keeping its `FilePath`. Songs only the secondary
/// knows are appended once per key, in the order the secondary first lists
/// them. When the secondary repeats a key, its last copy is the one used.
pub fn reconcile(primary: &Catalog, secondary: &Catalog) -> Catalog {
    let by_key: HashMap<IdentityKey, &SongRecord> = secondary
        .songs
        .iter()
        .map(|song| (song.identity_key(), song))
        .collect();

    let mut merged_count = 0;
    let mut primary_keys = HashSet::new();
    let mut songs: Vec<SongRecord> = primary
        .songs
        .iter()
        .map(|song| {
            let key = song.identity_key();
            let merged = match by_key.get(&key) {
                Some(other) => {
                    merged_count += 1;
                    let mut merged = merge_songs(song, other);
                    merged.file_path = song.file_path.clone();
                    merged
                }
                None => song.clone(),
            };
            primary_keys.insert(key);
            merged
        })
        .collect();

    let mut added = HashSet::new();
    for song in &secondary.songs {
        let key = song.identity_key();
        if primary_keys.contains(&key) || !added.insert(key.clone()) {
            continue;
        }
        debug!("Adding {} from secondary catalog", song.file_path);
        songs.push(by_key[&key].clone());
    }

    info!(
        "Reconciled catalogs: {} merged, {} added, {} total",
        merged_count,
        added.len(),
        songs.len()
    );

    primary.with_songs(songs)
}

/// Point every song found on disk at its current location.
///
/// Songs with no file on disk keep their previous path. Returns how many
/// paths actually changed.
pub fn rewrite_paths(catalog: &mut Catalog, scanned: &[ScannedFile]) -> usize {
    let by_hash: HashMap<&IdentityKey, &ScannedFile> =
        scanned.iter().map(|file| (&file.hash, file)).collect();

    let mut changed = 0;
    for song in &mut catalog.songs {
        let Some(file) = by_hash.get(&song.identity_key()) else {
            continue;
        };
        let current = file.path.to_string_lossy();
        if song.file_path != current {
            debug!("Moved: {} -> {}", song.file_path, current);
            song.file_path = current.into_owned();
            changed += 1;
        }
    }
    changed
}

/// Groups of mutually matching songs located under `root`, in catalog order.
pub fn find_duplicates<'a>(catalog: &'a Catalog, root: &Path) -> Vec<Vec<&'a SongRecord>> {
    let mut groups: Vec<Vec<&SongRecord>> = Vec::new();
    let mut group_of: HashMap<IdentityKey, usize> = HashMap::new();

    for song in catalog.songs.iter().filter(|s| s.is_under(root)) {
        let key = song.identity_key();
        match group_of.get(&key) {
            Some(&idx) => groups[idx].push(song),
            None => {
                group_of.insert(key, groups.len());
                groups.push(vec![song]);
            }
        }
    }

    groups.retain(|group| group.len() > 1);
    groups
}

/// Fold every duplicate under `root` into its first occurrence.
///
/// The first occurrence keeps its position and path. Returns the cleaned
/// catalog and the number of songs removed.
pub fn collapse_duplicates(catalog: &Catalog, root: &Path) -> (Catalog, usize) {
    let mut songs: Vec<SongRecord> = Vec::with_capacity(catalog.songs.len());
    let mut first_at: HashMap<IdentityKey, usize> = HashMap::new();
    let mut removed = 0;

    for song in &catalog.songs {
        if !song.is_under(root) {
            songs.push(song.clone());
            continue;
        }
        let key = song.identity_key();
        match first_at.get(&key) {
            Some(&idx) => {
                let mut merged = merge_songs(&songs[idx], song);
                merged.file_path = songs[idx].file_path.clone();
                songs[idx] = merged;
                removed += 1;
            }
            None => {
                first_at.insert(key, songs.len());
                songs.push(song.clone());
            }
        }
    }

    (catalog.with_songs(songs), removed)
}
