use cuesync::config::Config;
use tempfile::TempDir;

#[test]
fn test_config_lifecycle() {
    // Create a temporary directory for test config
    let temp_dir = TempDir::new().unwrap();

    // Override the config path for testing
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    // Test that config doesn't exist initially
    assert!(!Config::exists().unwrap());

    // Missing file means defaults
    let defaults = Config::load().unwrap();
    assert_eq!(defaults.extensions, vec!["mp3", "mp4", "flac"]);
    assert_eq!(defaults.shared_file, "database.xml");

    // Create and save a config
    Config::new().save().unwrap();
    assert!(Config::exists().unwrap());

    // Test config mutation
    let mut config = Config::load().unwrap();
    config.set_value("memo_path", "~/cues/memo.json").unwrap();
    config.set_value("extensions", "mp3,wav").unwrap();
    config.save().unwrap();

    // Verify mutations persisted
    let reloaded = Config::load().unwrap();
    assert_eq!(reloaded.memo_path.as_deref(), Some("~/cues/memo.json"));
    assert_eq!(reloaded.extensions, vec!["mp3", "wav"]);
    let memo_path = reloaded.resolve_memo_path().unwrap();
    assert!(!memo_path.to_string_lossy().starts_with('~'));
    assert!(memo_path.ends_with("cues/memo.json"));

    // Test invalid key
    let mut config = Config::load().unwrap();
    assert!(config.set_value("invalid_key", "value").is_err());
}
