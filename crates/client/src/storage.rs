//! Durable key/value storage for the persisted session.
//!
//! The session occupies two entries: [`TOKEN_KEY`] holds the bearer token
//! and [`IDENTITY_KEY`] holds the serialized [`IdentityRecord`]. Backends
//! commit multi-entry writes as a unit. [`REJECTIONS_KEY`] counts
//! consecutive credential rejections across runs and is absent when zero.
//!
//! [`IdentityRecord`]: vitrine_core::IdentityRecord

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::warn;

/// Entry holding the opaque bearer token.
pub const TOKEN_KEY: &str = "admin_token";
/// Entry holding the serialized identity record.
pub const IDENTITY_KEY: &str = "admin_user";
/// Entry holding the consecutive credential-rejection count.
pub const REJECTIONS_KEY: &str = "admin_rejections";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage I/O failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session storage at {} is corrupt: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },
}

/// A durable string key/value store.
///
/// Methods are synchronous and are called while the session lock is held,
/// so implementations should finish quickly and never block on the network.
pub trait SessionStorage: Send + Sync + fmt::Debug {
    /// Read one entry; a missing entry is `Ok(None)`.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write all entries in a single commit.
    fn write(&self, entries: &[(&str, &str)]) -> Result<(), StorageError>;

    /// Remove the given entries. Missing entries are not an error.
    fn remove(&self, keys: &[&str]) -> Result<(), StorageError>;
}

/// In-process storage. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("keys", &self.entries.lock().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, e.g. to simulate state left behind by an earlier run.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn write(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut map = self.entries.lock();
        for (key, value) in entries {
            map.insert((*key).to_owned(), (*value).to_owned());
        }
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut map = self.entries.lock();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

/// Storage backed by a single JSON object file.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// reader never sees half a session. On Unix the file is created with mode
/// 0600.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Load the whole map. A missing file is an empty map.
    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(self.io_err(e)),
        };
        if contents.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Load for modification; a corrupt file is replaced rather than kept.
    fn load_for_update(&self) -> Result<(HashMap<String, String>, bool), StorageError> {
        match self.load() {
            Ok(map) => Ok((map, false)),
            Err(StorageError::Corrupt { message, .. }) => {
                warn!(path = %self.path.display(), error = %message, "discarding corrupt session file");
                Ok((HashMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn save(&self, map: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }

        let contents = serde_json::to_string_pretty(map).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let tmp = self.path.with_extension("tmp");
        {
            let mut file = open_private(&tmp).map_err(|e| self.io_err(e))?;
            file.write_all(contents.as_bytes())
                .map_err(|e| self.io_err(e))?;
            file.sync_all().map_err(|e| self.io_err(e))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

impl SessionStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn write(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let (mut map, _) = self.load_for_update()?;
        for (key, value) in entries {
            map.insert((*key).to_owned(), (*value).to_owned());
        }
        self.save(&map)
    }

    fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let (mut map, was_corrupt) = self.load_for_update()?;
        let mut changed = was_corrupt;
        for key in keys {
            changed |= map.remove(*key).is_some();
        }
        if changed {
            self.save(&map)?;
        }
        Ok(())
    }
}
