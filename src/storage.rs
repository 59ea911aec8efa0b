use std::path::PathBuf;

use thiserror::Error;

use crate::models::store::Store;

pub mod json;

/// Failures reading or writing the todo store. None of them are retried.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Could not read todo list '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Todo list '{path}' is not valid: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Todo list '{path}' has a version field that is not a number")]
    BadVersion { path: PathBuf },

    #[error("Todo list uses format version {0}, newer than this build supports. Upgrade todo.")]
    NewerVersion(u32),

    #[error("Could not encode todo list: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Could not write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not rotate backups in '{path}': {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load-all / save-all persistence of the pending and completed lists
pub trait Storage {
    fn load(&self) -> Result<Store, StorageError>;
    fn save(&self, store: &Store) -> Result<(), StorageError>;
}
