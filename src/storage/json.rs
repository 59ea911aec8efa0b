use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
};

use fs2::FileExt;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::{
    models::store::{CURRENT_VERSION, Store},
    storage::{Storage, StorageError},
};

/// Number of previous todo lists kept in the `backups` directory
const BACKUPS_TO_KEEP: usize = 5;

/// Stores both todo collections in a single JSON document.
///
/// Saving never leaves a half-written file behind: the new contents go to a
/// temporary sibling that is renamed over the store while a lock file is
/// held. The list being replaced is copied into `backups/` first.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn backups_dir(&self) -> PathBuf {
        let parent = self.path.parent().unwrap_or(Path::new("."));
        parent.join("backups")
    }

    fn write_err(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
        move |source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    fn backup_err(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
        move |source| StorageError::Backup {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Copies the list about to be replaced into the backups directory.
    /// Nothing happens on the very first save.
    fn back_up_current(&self) -> Result<(), StorageError> {
        if !self.path.is_file() {
            return Ok(());
        }

        let dir = self.backups_dir();
        fs::create_dir_all(&dir).map_err(Self::backup_err(&dir))?;

        let stem = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store.json".to_string());
        // zero-padded so that lexical order is age order
        let nanos = jiff::Timestamp::now().as_nanosecond();
        let target = dir.join(format!("{stem}-{nanos:020}"));

        fs::copy(&self.path, &target).map_err(Self::backup_err(&target))?;
        debug!(backup = %target.display(), "backed up todo list");
        Ok(())
    }

    fn prune_backups(&self) -> Result<(), StorageError> {
        let dir = self.backups_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(Self::backup_err(&dir)(e)),
        };

        let mut backups: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        backups.sort();

        let excess = backups.len().saturating_sub(BACKUPS_TO_KEEP);
        for stale in backups.drain(..excess) {
            fs::remove_file(&stale).map_err(Self::backup_err(&stale))?;
        }
        if excess > 0 {
            debug!(removed = excess, "pruned old backups");
        }
        Ok(())
    }

    fn lock(&self) -> Result<File, StorageError> {
        let lock_path = self.path.with_extension("lock");
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(Self::write_err(&lock_path))?;
        lock.lock_exclusive().map_err(Self::write_err(&lock_path))?;
        Ok(lock)
    }

    /// A missing `version` field means the first schema
    fn read_version(&self, data: &Value) -> Result<u32, StorageError> {
        let Some(version) = data.get("version") else {
            return Ok(1);
        };
        version
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| StorageError::BadVersion {
                path: self.path.clone(),
            })
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Store, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no todo list yet, starting empty");
                return Ok(Store::default());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let corrupt = |source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        };

        let mut data: Value = serde_json::from_str(&content).map_err(corrupt)?;

        let version = self.read_version(&data)?;
        if version > CURRENT_VERSION {
            return Err(StorageError::NewerVersion(version));
        }
        if let Some(obj) = data.as_object_mut() {
            obj.insert("version".to_string(), Value::from(CURRENT_VERSION));
        }

        let store: Store = serde_json::from_value(data).map_err(corrupt)?;
        debug!(
            path = %self.path.display(),
            pending = store.pending.len(),
            completed = store.completed.len(),
            "loaded todo list"
        );
        Ok(store)
    }

    fn save(&self, store: &Store) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(store).map_err(StorageError::Encode)?;

        let temp_path = PathBuf::from(format!("{}.tmp.{}", self.path.display(), Uuid::new_v4()));
        fs::write(&temp_path, json).map_err(Self::write_err(&temp_path))?;

        let lock = self.lock()?;

        self.back_up_current()?;
        self.prune_backups()?;
        fs::rename(&temp_path, &self.path).map_err(Self::write_err(&self.path))?;

        // released on drop as well; unlocking here surfaces any error
        FileExt::unlock(&lock).map_err(Self::write_err(&self.path))?;

        debug!(
            path = %self.path.display(),
            pending = store.pending.len(),
            completed = store.completed.len(),
            "saved todo list"
        );
        Ok(())
    }
}
