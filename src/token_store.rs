//! Persisted token pair storage
//!
//! The token pair lives under one well-known key as a single serialized
//! record. Backends only ever replace the whole value, so a reader sees
//! either the old pair, the new pair, or nothing.

use crate::error::{ClientError, Result};
use crate::types::AuthTokens;
use papaya::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Key the token pair is stored under by default
pub const DEFAULT_STORAGE_KEY: &str = "authTokens";

/// Key/value persistence for serialized client state
pub trait TokenStorage: Send + Sync + 'static {
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value for `key` in a single step
    fn write(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local storage using a Papaya HashMap
#[derive(Clone, Default)]
pub struct MemoryStorage {
    values: Arc<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.pin().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.values.pin().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.pin().remove(key);
        Ok(())
    }
}

/// Durable storage: one JSON file per key inside a directory
///
/// Every write goes to its own temporary sibling file which is then renamed
/// over the target, so readers never see a half-written record, even with
/// several writers. Each key is read from disk at most once; after that the
/// in-process copy is authoritative and disk is only written through.
/// Clones share that copy, so open one `FileStorage` per directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    /// `None` marks a key known to be absent
    cache: Arc<HashMap<String, Option<String>>>,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| ClientError::Storage(format!("Cannot create {}: {e}", dir.display())))?;
        Ok(Self {
            dir,
            cache: Arc::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read_from_disk(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::Storage(format!("Failed to read {key}: {e}"))),
        }
    }
}

impl TokenStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let cache = self.cache.pin();
        if let Some(cached) = cache.get(key) {
            return Ok(cached.clone());
        }

        let loaded = self.read_from_disk(key)?;
        // A write or remove that landed meanwhile wins over what was loaded
        match cache.try_insert(key.to_string(), loaded.clone()) {
            Ok(_) => Ok(loaded),
            Err(occupied) => Ok(occupied.current.clone()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let target = self.path_for(key);

        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{key}.json."))
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(|e| ClientError::Storage(format!("Failed to create temp file for {key}: {e}")))?;
        tmp.write_all(value.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| ClientError::Storage(format!("Failed to write {key}: {e}")))?;
        tmp.persist(&target)
            .map_err(|e| ClientError::Storage(format!("Failed to replace {}: {}", target.display(), e.error)))?;

        self.cache.pin().insert(key.to_string(), Some(value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(ClientError::Storage(format!("Failed to remove {key}: {e}"))),
        }
        self.cache.pin().insert(key.to_string(), None);
        Ok(())
    }
}

/// Token pair store
///
/// Cheap to clone; clones share the same backend.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn TokenStorage>,
    key: String,
}

impl TokenStore {
    /// Create a token store over any backend
    pub fn new(storage: impl TokenStorage, key: impl Into<String>) -> Self {
        Self {
            storage: Arc::new(storage),
            key: key.into(),
        }
    }

    /// In-memory store under the default key
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new(), DEFAULT_STORAGE_KEY)
    }

    /// File-backed store under the default key
    pub fn on_disk(dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(FileStorage::new(dir)?, DEFAULT_STORAGE_KEY))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the stored token pair
    ///
    /// A record that cannot be read, does not parse, or is missing either
    /// token is treated as absent.
    pub fn get(&self) -> Option<AuthTokens> {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read stored tokens");
                return None;
            }
        };

        match serde_json::from_str::<AuthTokens>(&raw) {
            Ok(tokens) if tokens.is_complete() => Some(tokens),
            Ok(_) => {
                warn!(key = %self.key, "Stored token pair is incomplete, ignoring it");
                None
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored token pair is malformed, ignoring it");
                None
            }
        }
    }

    /// Store a complete token pair, replacing any previous one
    pub fn store(&self, tokens: &AuthTokens) -> Result<()> {
        if !tokens.is_complete() {
            return Err(ClientError::Storage("Refusing to store an incomplete token pair".to_string()));
        }
        let serialized = serde_json::to_string(tokens)?;
        self.storage.write(&self.key, &serialized)?;
        debug!(key = %self.key, "Stored token pair");
        Ok(())
    }

    /// Replace the access token, keeping the stored refresh token
    ///
    /// Returns the updated pair, or `None` if nothing was stored (for
    /// example the session was logged out while a refresh was in flight).
    pub fn update_access(&self, access: &str) -> Result<Option<AuthTokens>> {
        let Some(current) = self.get() else {
            return Ok(None);
        };
        let updated = current.with_access(access);
        self.store(&updated)?;
        Ok(Some(updated))
    }

    /// Check if a token pair is stored
    pub fn contains(&self) -> bool {
        self.get().is_some()
    }

    /// Remove the stored token pair
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(&self.key)?;
        debug!(key = %self.key, "Cleared token pair");
        Ok(())
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
