use cuesync::catalog::{Catalog, Poi, SongRecord, xml};
use cuesync::error::{Error, Result};
use cuesync::memo::{Memo, MemoEntry};
use cuesync::sync::{SyncOptions, run};
use cuesync::vcs::SharedCatalog;
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Workspace {
    _temp: TempDir,
    music: PathBuf,
    options: SyncOptions,
}

fn workspace() -> Workspace {
    let temp = TempDir::new().unwrap();
    let music = temp.path().join("music");
    fs::create_dir_all(&music).unwrap();
    let options = SyncOptions {
        root: music.clone(),
        catalog_path: temp.path().join("vdj").join("database.xml"),
        memo_path: temp.path().join("config").join("memo.json"),
        extensions: vec!["mp3".to_string(), "flac".to_string()],
    };
    Workspace {
        _temp: temp,
        music,
        options,
    }
}

fn write_media(path: &Path, size: usize) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, vec![0u8; size]).unwrap();
}

fn song_at(path: &Path, size: u64) -> SongRecord {
    SongRecord::new(path.to_string_lossy(), size)
}

fn cue(pos: &str, num: &str) -> Poi {
    Poi::new([("Pos", pos), ("Num", num)].into_iter().collect())
}

/// Shared catalog that records calls instead of running git.
struct FakeShared {
    path: PathBuf,
    fail_pull: bool,
    pulled: Cell<bool>,
    messages: RefCell<Vec<String>>,
}

impl FakeShared {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            fail_pull: false,
            pulled: Cell::new(false),
            messages: RefCell::new(Vec::new()),
        }
    }
}

impl SharedCatalog for FakeShared {
    fn catalog_path(&self) -> PathBuf {
        self.path.clone()
    }

    fn pull(&self) -> Result<()> {
        if self.fail_pull {
            return Err(Error::VersionControl {
                command: "git pull origin master".to_string(),
                stderr: "could not read from remote".to_string(),
            });
        }
        self.pulled.set(true);
        Ok(())
    }

    fn publish(&self, message: &str) -> Result<bool> {
        self.messages.borrow_mut().push(message.to_string());
        Ok(true)
    }
}

#[test]
fn test_duplicates_abort_without_writes() {
    let ws = workspace();
    let catalog = Catalog::new(vec![
        song_at(&ws.music.join("a.mp3"), 10),
        song_at(&ws.music.join("copy").join("a.mp3"), 10),
    ]);
    xml::save(&ws.options.catalog_path, &catalog).unwrap();
    let memo = Memo {
        entries: vec![MemoEntry::from_record(&SongRecord::new("/x/keep.mp3", 1))],
    };
    memo.save(&ws.options.memo_path).unwrap();
    write_media(&ws.music.join("a.mp3"), 10);

    let catalog_before = fs::read(&ws.options.catalog_path).unwrap();
    let memo_before = fs::read(&ws.options.memo_path).unwrap();

    let err = run(&ws.options, None).unwrap_err();
    assert!(matches!(err, Error::DuplicateSongs { .. }));

    assert_eq!(fs::read(&ws.options.catalog_path).unwrap(), catalog_before);
    assert_eq!(fs::read(&ws.options.memo_path).unwrap(), memo_before);
}

#[test]
fn test_absent_memo_is_created() {
    let ws = workspace();
    let path = ws.music.join("a.mp3");
    write_media(&path, 12);
    let mut song = song_at(&path, 12);
    song.points.push(cue("3.5", "1"));
    xml::save(&ws.options.catalog_path, &Catalog::new(vec![song])).unwrap();

    let report = run(&ws.options, None).unwrap();
    assert_eq!(report.memo_added, 1);
    assert_eq!(report.songs, 1);

    let memo = Memo::load(&ws.options.memo_path).unwrap();
    assert_eq!(memo.len(), 1);
    assert_eq!(memo.entries[0].name, "a.mp3");
    assert_eq!(memo.entries[0].cues[0].get("Pos"), Some("3.5"));
}

#[test]
fn test_forgotten_song_is_restored_from_memo() {
    let ws = workspace();
    xml::save(&ws.options.catalog_path, &Catalog::default()).unwrap();

    let mut remembered = song_at(&ws.music.join("gone.mp3"), 40);
    remembered.points.push(cue("12.0", "2"));
    let memo = Memo {
        entries: vec![MemoEntry::from_record(&remembered)],
    };
    memo.save(&ws.options.memo_path).unwrap();

    let report = run(&ws.options, None).unwrap();
    assert_eq!(report.catalog_added, 1);

    let catalog = xml::load(&ws.options.catalog_path).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.songs[0].file_path, remembered.file_path);
    assert_eq!(catalog.songs[0].file_size, Some(40));
    assert_eq!(catalog.songs[0].points[0].pos(), Some("12.0"));
}

#[test]
fn test_moved_file_gets_new_path_and_keeps_cues() {
    let ws = workspace();
    let moved_to = ws.music.join("house").join("track.mp3");
    write_media(&moved_to, 7);

    let mut song = SongRecord::new("/somewhere/else/track.mp3", 7);
    song.points.push(cue("1.0", "1"));
    let untouched = SongRecord::new("/somewhere/else/other.mp3", 3);
    xml::save(
        &ws.options.catalog_path,
        &Catalog::new(vec![song, untouched]),
    )
    .unwrap();

    let report = run(&ws.options, None).unwrap();
    assert_eq!(report.scanned_files, 1);
    assert_eq!(report.paths_rewritten, 1);

    let catalog = xml::load(&ws.options.catalog_path).unwrap();
    assert_eq!(catalog.songs[0].file_path, moved_to.to_string_lossy());
    assert_eq!(catalog.songs[0].points.len(), 1);
    assert_eq!(catalog.songs[1].file_path, "/somewhere/else/other.mp3");

    // Only songs under the music folder are remembered
    let memo = Memo::load(&ws.options.memo_path).unwrap();
    assert_eq!(memo.len(), 1);
    assert_eq!(memo.entries[0].path, moved_to.to_string_lossy());
}

#[test]
fn test_stale_entry_folds_into_rescanned_song() {
    let ws = workspace();
    let current = ws.music.join("a.mp3");
    write_media(&current, 10);

    let mut stale = SongRecord::new("/old/place/a.mp3", 10);
    stale.points.push(cue("4.0", "1"));
    let mut fresh = song_at(&current, 10);
    fresh.attrs.set("Flag", "2");
    xml::save(&ws.options.catalog_path, &Catalog::new(vec![stale, fresh])).unwrap();

    let report = run(&ws.options, None).unwrap();
    assert_eq!(report.paths_rewritten, 1);
    assert_eq!(report.duplicates_folded, 1);

    let catalog = xml::load(&ws.options.catalog_path).unwrap();
    assert_eq!(catalog.len(), 1);
    let song = &catalog.songs[0];
    assert_eq!(song.file_path, current.to_string_lossy());
    assert_eq!(song.points[0].pos(), Some("4.0"));
    assert_eq!(song.attrs.get("Flag"), Some("2"));

    // A second run has nothing left to fold
    let again = run(&ws.options, None).unwrap();
    assert_eq!(again.duplicates_folded, 0);
    assert_eq!(xml::load(&ws.options.catalog_path).unwrap().len(), 1);
}

#[test]
fn test_shared_catalog_is_reconciled_and_published() {
    let ws = workspace();
    let local_path = ws.music.join("a.mp3");
    write_media(&local_path, 5);
    xml::save(
        &ws.options.catalog_path,
        &Catalog::new(vec![song_at(&local_path, 5)]),
    )
    .unwrap();

    let shared_dir = ws.options.catalog_path.parent().unwrap().join("shared");
    let shared_file = shared_dir.join("database.xml");
    let mut theirs = SongRecord::new("D:\\Music\\b.mp3", 9);
    theirs.points.push(cue("2.0", "1"));
    xml::save(&shared_file, &Catalog::new(vec![theirs])).unwrap();

    let shared = FakeShared::new(shared_file.clone());
    let report = run(&ws.options, Some(&shared)).unwrap();

    assert!(shared.pulled.get());
    assert!(report.shared_published);
    assert_eq!(report.shared_added, 1);
    let messages = shared.messages.borrow();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Updated database.xml from "));

    let published = xml::load(&shared_file).unwrap();
    let names: Vec<&str> = published.songs.iter().map(SongRecord::base_name).collect();
    assert_eq!(names, vec!["a.mp3", "b.mp3"]);

    let local = xml::load(&ws.options.catalog_path).unwrap();
    assert_eq!(local.len(), 2);
    assert_eq!(local.songs[1].points[0].pos(), Some("2.0"));
}

#[test]
fn test_failed_pull_writes_nothing() {
    let ws = workspace();
    let path = ws.music.join("a.mp3");
    write_media(&path, 5);
    xml::save(&ws.options.catalog_path, &Catalog::new(vec![song_at(&path, 5)])).unwrap();
    let catalog_before = fs::read(&ws.options.catalog_path).unwrap();

    let mut shared = FakeShared::new(ws.music.join("nowhere.xml"));
    shared.fail_pull = true;

    let err = run(&ws.options, Some(&shared)).unwrap_err();
    assert!(matches!(err, Error::VersionControl { .. }));
    assert!(shared.messages.borrow().is_empty());
    assert!(!ws.options.memo_path.exists());
    assert_eq!(fs::read(&ws.options.catalog_path).unwrap(), catalog_before);
}

#[test]
fn test_malformed_catalog_aborts() {
    let ws = workspace();
    fs::create_dir_all(ws.options.catalog_path.parent().unwrap()).unwrap();
    fs::write(&ws.options.catalog_path, "<VirtualDJ_Database><Song></VirtualDJ_Database>").unwrap();

    let err = run(&ws.options, None).unwrap_err();
    assert!(matches!(err, Error::MalformedCatalog { .. }));
    assert!(!ws.options.memo_path.exists());
}
