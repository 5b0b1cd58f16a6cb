//! # Record Stores
//!
//! A record store is a flat key → text mapping, the same contract a
//! browser's local storage offers. The submission log keeps its whole
//! history as one JSON document under one key.
//!
//! - [`MemoryStore`] — process-local, for tests and ephemeral hosts.
//! - [`FileStore`] — one `<key>.json` file per key in a directory. Writes
//!   go to a temporary file in the same directory and are renamed into
//!   place, so a crash never leaves a half-written log behind.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dynform_core::PersistenceError;

/// Key-value persistence for serialized records.
pub trait RecordStore: Send {
    /// The text stored under `key`, or `None` if nothing is stored.
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Store `contents` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, contents: &str) -> Result<(), PersistenceError>;

    /// Delete `key`. Deleting a missing key succeeds.
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, contents: &str) -> Result<(), PersistenceError> {
        (**self).save(key, contents)
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove(key)
    }
}

/// Whether `key` is usable with every backend: non-empty ASCII letters,
/// digits, `-` and `_`. Such keys cannot escape a [`FileStore`] directory.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// ─── Memory ──────────────────────────────────────────────────────────

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, contents: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ─── File ────────────────────────────────────────────────────────────

/// Directory-backed store.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// A store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Rejects keys that fail [`is_valid_key`].
    pub fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        if !is_valid_key(key) {
            return Err(PersistenceError::Save {
                key: key.to_string(),
                reason: "keys may contain only ASCII letters, digits, '-' and '_'".to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl RecordStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Load {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn save(&mut self, key: &str, contents: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| save_error(key, e))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| save_error(key, e))?;
        tmp.write_all(contents.as_bytes())
            .map_err(|e| save_error(key, e))?;
        tmp.persist(&path).map_err(|e| save_error(key, e.error))?;
        tracing::debug!(key, path = %path.display(), bytes = contents.len(), "record store saved");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(save_error(key, e)),
        }
    }
}

fn save_error(key: &str, e: io::Error) -> PersistenceError {
    PersistenceError::Save {
        key: key.to_string(),
        reason: e.to_string(),
    }
}
