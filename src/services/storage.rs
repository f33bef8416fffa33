use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::AppError;

/// Durable key/value substrate the stores persist into. A `write` replaces the
/// whole value under `key` in one step.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, AppError>;
    async fn write(&self, key: &str, value: &[u8]) -> Result<(), AppError>;
}

/// One JSON document per key inside `root`.
#[derive(Clone)]
pub struct FileStorage {
    root: Arc<PathBuf>,
}

impl FileStorage {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_structure(&self) -> Result<(), AppError> {
        fs::create_dir_all(self.root()).await?;
        Ok(())
    }

    pub fn key_path(&self, key: &str) -> Result<PathBuf, AppError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::BadRequest(format!("invalid storage key {key:?}")));
        }
        Ok(self.root().join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStorage {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let path = self.key_path(key)?;
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }
        let raw = fs::read(&path).await?;
        if raw.is_empty() {
            return Ok(None);
        }
        Ok(Some(raw))
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<(), AppError> {
        let path = self.key_path(key)?;
        self.ensure_structure().await?;
        // Rename over the old file so readers never see a half-written value.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, AppError> {
        self.entries
            .lock()
            .map_err(|_| AppError::Other(anyhow::anyhow!("memory storage lock poisoned")))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<(), AppError> {
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Reads and decodes the state under `key`. Missing, unreadable or malformed
/// state all come back as `None`.
pub async fn load_state<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match storage.read(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "no persisted state");
            return None;
        }
        Err(err) => {
            warn!(key, "reading persisted state failed: {err}");
            return None;
        }
    };
    match serde_json::from_slice(&raw) {
        Ok(state) => Some(state),
        Err(err) => {
            warn!(key, "discarding malformed persisted state: {err}");
            None
        }
    }
}

pub async fn save_state<T: Serialize + ?Sized>(
    storage: &dyn KeyValueStore,
    key: &str,
    state: &T,
) -> Result<(), AppError> {
    let data = serde_json::to_vec_pretty(state)?;
    storage.write(key, &data).await
}
