use std::path::{Path, PathBuf};

use tracing::debug;

const APP_DIR: &str = "todo";
const STORE_FILE: &str = "store.json";

/// Where the store lives, resolved once at startup and handed to storage
#[derive(Debug, Clone)]
pub struct Config {
    pub store_path: PathBuf,
}

impl Config {
    /// Uses `store_override` when given, the platform data dir otherwise
    pub fn resolve(store_override: Option<PathBuf>) -> Self {
        let store_path = store_override.unwrap_or_else(Self::default_store_path);
        debug!(store = %store_path.display(), "resolved store location");
        Self { store_path }
    }

    pub fn default_store_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(STORE_FILE)
    }

    /// Create the directory holding the store file if it doesn't exist
    pub fn ensure_store_dir(&self) -> std::io::Result<()> {
        match self.store_path.parent() {
            Some(parent) if parent != Path::new("") => std::fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}
