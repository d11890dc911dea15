use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use gemini_chat::config::Config;
use gemini_chat::storage::{SqliteStore, StateRepository};

#[allow(dead_code)]
pub fn create_temp_storage() -> (SqliteStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("state.db");
    let store = SqliteStore::new_with_path(db_path).expect("failed to create sqlite store with path");
    (store, tmp)
}

/// Repository over a database file that outlives the returned handle
#[allow(dead_code)]
pub fn open_repository(db_path: &std::path::Path) -> StateRepository {
    let store = SqliteStore::new_with_path(db_path).expect("failed to open sqlite store");
    StateRepository::new(store)
}

/// Default configuration pointed at a mock server
#[allow(dead_code)]
pub fn config_for(base_url: &str) -> Config {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
