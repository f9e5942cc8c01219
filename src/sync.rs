//! Three-way sync between the local catalog, the memo and, optionally, the
//! shared catalog.
//!
//! Everything happens in memory first. Files are only written once every
//! step has succeeded, so an aborted run leaves the catalog, the memo and the
//! shared copy exactly as they were.

use crate::catalog::{Catalog, SongRecord, xml};
use crate::error::{Error, Result};
use crate::identity::IdentityKey;
use crate::memo::{Memo, MemoEntry};
use crate::merge::merge_songs;
use crate::reconcile::{collapse_duplicates, find_duplicates, reconcile, rewrite_paths};
use crate::scan::scan_media;
use crate::vcs::{SharedCatalog, commit_message};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Inputs of one sync run, resolved once at startup.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Music folder whose files are rescanned
    pub root: PathBuf,
    pub catalog_path: PathBuf,
    pub memo_path: PathBuf,
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub songs: usize,
    pub scanned_files: usize,
    pub paths_rewritten: usize,
    /// Stale entries folded into the song they turned out to be
    pub duplicates_folded: usize,
    pub shared_added: usize,
    pub shared_published: bool,
    pub memo_merged: usize,
    pub memo_added: usize,
    pub catalog_merged: usize,
    pub catalog_added: usize,
}

pub fn run(options: &SyncOptions, shared: Option<&dyn SharedCatalog>) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    let mut catalog = xml::load(&options.catalog_path)?;
    ensure_no_duplicates(&catalog, &options.root)?;
    let mut memo = Memo::load(&options.memo_path)?;

    let outgoing = match shared {
        Some(shared) => {
            shared.pull()?;
            let other = xml::load(&shared.catalog_path())?;
            let before = catalog.len();
            catalog = reconcile(&catalog, &other);
            report.shared_added = catalog.len() - before;
            Some(catalog.clone())
        }
        None => None,
    };

    info!("Scanning {}", options.root.display());
    let files = scan_media(&options.root, &options.extensions)?;
    report.scanned_files = files.len();
    report.paths_rewritten = rewrite_paths(&mut catalog, &files);
    let (folded, removed) = collapse_duplicates(&catalog, &options.root);
    if removed > 0 {
        info!("Folded {removed} stale entries into their moved songs");
        catalog = folded;
    }
    report.duplicates_folded = removed;

    let (merged, added) = absorb_catalog_into_memo(&catalog, &mut memo, &options.root);
    report.memo_merged = merged;
    report.memo_added = added;

    let (merged, added) = absorb_memo_into_catalog(&memo, &mut catalog);
    report.catalog_merged = merged;
    report.catalog_added = added;
    report.songs = catalog.len();

    if let (Some(shared), Some(outgoing)) = (shared, outgoing) {
        xml::save(&shared.catalog_path(), &outgoing)?;
        report.shared_published = shared.publish(&commit_message())?;
    }
    xml::save(&options.catalog_path, &catalog)?;
    memo.save(&options.memo_path)?;

    info!("Sync finished: {report:?}");
    Ok(report)
}

/// Fails when two songs under `root` share a file name and size.
pub fn ensure_no_duplicates(catalog: &Catalog, root: &Path) -> Result<()> {
    let groups = find_duplicates(catalog, root);
    if groups.is_empty() {
        return Ok(());
    }

    Err(Error::DuplicateSongs {
        root: root.to_path_buf(),
        groups: groups
            .iter()
            .map(|group| group.iter().map(|s| s.file_path.clone()).collect())
            .collect(),
    })
}

/// Phase 1: every catalog song under `root` is merged into its memo entry,
/// or appended to the memo. Returns (merged, added).
pub fn absorb_catalog_into_memo(catalog: &Catalog, memo: &mut Memo, root: &Path) -> (usize, usize) {
    let mut index = first_positions(memo.entries.iter().map(MemoEntry::identity_key));
    let (mut merged, mut added) = (0, 0);

    for song in catalog.songs.iter().filter(|s| s.is_under(root)) {
        let key = song.identity_key();
        match index.get(&key) {
            Some(&idx) => {
                let combined = merge_songs(&memo.entries[idx].to_record(), song);
                memo.entries[idx] = MemoEntry::from_record(&combined);
                merged += 1;
            }
            None => {
                debug!("Memo learns {}", song.file_path);
                index.insert(key, memo.entries.len());
                memo.entries.push(MemoEntry::from_record(song));
                added += 1;
            }
        }
    }
    (merged, added)
}

/// Phase 2: every memo entry is merged into its catalog song, or added to
/// the catalog as a new song. Matched songs keep their catalog path, which
/// already reflects the latest scan. Returns (merged, added).
pub fn absorb_memo_into_catalog(memo: &Memo, catalog: &mut Catalog) -> (usize, usize) {
    let mut index = first_positions(catalog.songs.iter().map(SongRecord::identity_key));
    let (mut merged, mut added) = (0, 0);

    for entry in &memo.entries {
        let remembered = entry.to_record();
        let key = entry.identity_key();
        match index.get(&key) {
            Some(&idx) => {
                let song = &catalog.songs[idx];
                let mut combined = merge_songs(song, &remembered);
                combined.file_path = song.file_path.clone();
                catalog.songs[idx] = combined;
                merged += 1;
            }
            None => {
                debug!("Catalog regains {}", entry.path);
                index.insert(key, catalog.songs.len());
                catalog.songs.push(remembered);
                added += 1;
            }
        }
    }
    (merged, added)
}

fn first_positions(keys: impl Iterator<Item = IdentityKey>) -> HashMap<IdentityKey, usize> {
    let mut index = HashMap::new();
    for (idx, key) in keys.enumerate() {
        index.entry(key).or_insert(idx);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Poi;

    fn cue(pos: &str, num: &str) -> Poi {
        Poi::new([("Pos", pos), ("Num", num)].into_iter().collect())
    }

    #[test]
    fn test_phase_one_merges_and_appends() {
        let mut song = SongRecord::new("/m/a.mp3", 10);
        song.points.push(cue("1.0", "1"));
        let catalog = Catalog::new(vec![
            song,
            SongRecord::new("/m/b.mp3", 20),
            SongRecord::new("/elsewhere/c.mp3", 30),
        ]);
        let mut memo = Memo {
            entries: vec![MemoEntry {
                name: "a.mp3".to_string(),
                path: "/old/a.mp3".to_string(),
                size: Some(10),
                cues: vec![[("Pos", "5.0"), ("Num", "2")].into_iter().collect()],
            }],
        };

        let (merged, added) = absorb_catalog_into_memo(&catalog, &mut memo, Path::new("/m"));
        assert_eq!((merged, added), (1, 1));
        assert_eq!(memo.len(), 2);
        assert_eq!(memo.entries[0].path, "/m/a.mp3");
        assert_eq!(memo.entries[0].cues.len(), 2);
        assert_eq!(memo.entries[1].name, "b.mp3");
    }

    #[test]
    fn test_phase_two_restores_forgotten_songs() {
        let mut catalog = Catalog::new(vec![SongRecord::new("/m/a.mp3", 10)]);
        let memo = Memo {
            entries: vec![
                MemoEntry {
                    name: "a.mp3".to_string(),
                    path: "/m/a.mp3".to_string(),
                    size: Some(10),
                    cues: vec![[("Pos", "1.0"), ("Num", "1")].into_iter().collect()],
                },
                MemoEntry {
                    name: "gone.mp3".to_string(),
                    path: "/m/gone.mp3".to_string(),
                    size: Some(99),
                    cues: vec![],
                },
            ],
        };

        let (merged, added) = absorb_memo_into_catalog(&memo, &mut catalog);
        assert_eq!((merged, added), (1, 1));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.songs[0].points.len(), 1);
        assert_eq!(catalog.songs[1].file_path, "/m/gone.mp3");
        assert_eq!(catalog.songs[1].file_size, Some(99));
    }

    #[test]
    fn test_phase_two_keeps_catalog_metadata() {
        let mut song = SongRecord::new("/m/a.mp3", 10);
        song.tags = Some([("Title", "Keep me")].into_iter().collect());
        song.attrs.set("Flag", "1");
        let mut catalog = Catalog::new(vec![song]);
        let memo = Memo {
            entries: vec![MemoEntry {
                name: "a.mp3".to_string(),
                path: "/m/a.mp3".to_string(),
                size: Some(10),
                cues: vec![],
            }],
        };

        absorb_memo_into_catalog(&memo, &mut catalog);
        let song = &catalog.songs[0];
        assert_eq!(song.tags.as_ref().and_then(|t| t.get("Title")), Some("Keep me"));
        assert_eq!(song.attrs.get("Flag"), Some("1"));
    }

    #[test]
    fn test_duplicate_gate() {
        let catalog = Catalog::new(vec![
            SongRecord::new("/m/a.mp3", 10),
            SongRecord::new("/m/x/a.mp3", 10),
        ]);
        let err = ensure_no_duplicates(&catalog, Path::new("/m")).unwrap_err();
        match err {
            Error::DuplicateSongs { groups, .. } => {
                assert_eq!(groups, vec![vec!["/m/a.mp3".to_string(), "/m/x/a.mp3".to_string()]]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(ensure_no_duplicates(&catalog, Path::new("/other")).is_ok());
    }
}
