//! Behavior-driven tests for the config file
//!
//! These tests verify HOW the config is loaded, created from the prompt when
//! missing, and recreated when unusable.

use std::fs;
use std::io::Cursor;

use tickwatch_core::{ConfigError, ConfigStore, CursorMode, Symbol, TickerConfig};

fn raw_symbols(config: &TickerConfig) -> Vec<&str> {
    config.symbols.iter().map(Symbol::as_str).collect()
}

// =============================================================================
// Config: Existing File
// =============================================================================

#[test]
fn when_config_file_is_valid_it_is_loaded_without_prompting() {
    // Given: A config file listing two symbols
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tickwatch-config.json");
    fs::write(&path, r#"{"symbols":["AAPL","NOK"]}"#).expect("write config");
    let store = ConfigStore::new(&path);

    // When: The config is loaded with an empty prompt input
    let mut input = Cursor::new("");
    let mut output = Vec::new();
    let config = store
        .load_or_create(&mut input, &mut output)
        .expect("config loads");

    // Then: The file's symbols are used and nothing was asked
    assert_eq!(raw_symbols(&config), vec!["AAPL", "NOK"]);
    assert!(output.is_empty());
}

#[test]
fn when_tuning_keys_are_present_they_override_defaults() {
    let config = TickerConfig::from_json(
        r#"{"symbols":["NOK"],"poll_interval_secs":10,"window_secs":120,"shared_cursor":true}"#,
    )
    .expect("valid config");

    assert_eq!(config.history_capacity(), Ok(12));
    assert_eq!(config.cursor_mode(), CursorMode::Shared);
    assert_eq!(config.refresh_interval_ms, 200);
}

#[test]
fn when_saved_config_is_loaded_back_it_is_unchanged() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ConfigStore::new(dir.path().join("tickwatch-config.json"));
    let config = TickerConfig::new(vec![
        Symbol::parse("NOKIA.HE").expect("valid"),
        Symbol::parse("gme").expect("valid"),
    ]);

    store.save(&config).expect("save");
    let loaded = store.load().expect("load");

    assert_eq!(loaded, config);
    assert_eq!(raw_symbols(&loaded), vec!["NOKIA.HE", "gme"]);
}

// =============================================================================
// Config: Missing or Corrupt File
// =============================================================================

#[test]
fn when_config_file_is_missing_it_is_created_from_the_prompt() {
    // Given: No config file
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tickwatch-config.json");
    let store = ConfigStore::new(&path);

    // When: The user enters three tickers
    let mut input = Cursor::new("TSLA NIO AAPL\n");
    let mut output = Vec::new();
    let config = store
        .load_or_create(&mut input, &mut output)
        .expect("config created");

    // Then: The prompt was shown and the answer was persisted
    assert_eq!(raw_symbols(&config), vec!["TSLA", "NIO", "AAPL"]);
    assert!(String::from_utf8_lossy(&output).contains("Enter tickers"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("file written")).expect("json");
    assert_eq!(written["symbols"], serde_json::json!(["TSLA", "NIO", "AAPL"]));
}

#[test]
fn when_prompt_answer_is_empty_default_symbols_are_used() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ConfigStore::new(dir.path().join("tickwatch-config.json"));

    let mut input = Cursor::new("\n");
    let mut output = Vec::new();
    let config = store
        .load_or_create(&mut input, &mut output)
        .expect("config created");

    assert_eq!(raw_symbols(&config), vec!["GME", "NOK", "NOKIA.HE"]);
}

#[test]
fn when_config_file_is_corrupt_it_is_deleted_and_recreated() {
    // Given: A file that is not JSON
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tickwatch-config.json");
    fs::write(&path, "symbols = GME").expect("write garbage");
    let store = ConfigStore::new(&path);

    // When: The config is loaded
    let mut input = Cursor::new("NOK\n");
    let mut output = Vec::new();
    let config = store
        .load_or_create(&mut input, &mut output)
        .expect("config recreated");

    // Then: The prompt answer replaced the broken file
    assert_eq!(raw_symbols(&config), vec!["NOK"]);
    let reloaded = store.load().expect("new file is valid");
    assert_eq!(reloaded, config);
}

#[test]
fn when_symbols_key_is_missing_the_file_is_recreated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tickwatch-config.json");
    fs::write(&path, r#"{"tickers":["GME"]}"#).expect("write config");
    let store = ConfigStore::new(&path);

    assert!(matches!(store.load(), Err(ConfigError::Json(_))));

    let mut input = Cursor::new("GME\n");
    let mut output = Vec::new();
    let config = store
        .load_or_create(&mut input, &mut output)
        .expect("config recreated");
    assert_eq!(raw_symbols(&config), vec!["GME"]);
}

#[test]
fn when_config_file_is_not_utf8_it_is_deleted_and_recreated() {
    // Given: A config file holding raw binary
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tickwatch-config.json");
    fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).expect("write binary");
    let store = ConfigStore::new(&path);

    // When: The config is loaded
    let mut input = Cursor::new("AAPL\n");
    let mut output = Vec::new();
    let config = store
        .load_or_create(&mut input, &mut output)
        .expect("config recreated");

    // Then: The prompt answer replaced the unreadable file
    assert_eq!(raw_symbols(&config), vec!["AAPL"]);
    assert_eq!(store.load().expect("new file is valid"), config);
}
