//! String keyed local storage. The web client keeps these values in
//! `localStorage`; here every key is one file in the data directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::StorageError;

pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key below a directory
#[derive(Clone, Debug)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let directory = directory.into();
        if !directory.exists() {
            std::fs::create_dir_all(&directory).map_err(|e| StorageError::Io {
                path: directory.clone(),
                source: e,
            })?;
        }
        Ok(Self { directory })
    }

    /// A store in the platform specific config directory
    pub fn in_data_directory() -> Result<Self, StorageError> {
        Self::new(data_directory()?)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.directory.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StorageError::Io { path, source: e })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        std::fs::write(&path, value).map_err(|e| StorageError::Io { path, source: e })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(());
        }
        std::fs::remove_file(&path).map_err(|e| StorageError::Io { path, source: e })
    }
}

pub fn data_directory() -> Result<PathBuf, StorageError> {
    use directories_next::ProjectDirs;
    let Some(proj_dirs) = ProjectDirs::from("org", "geev", "geev") else {
        return Err(StorageError::NoDataDirectory);
    };
    Ok(proj_dirs.config_dir().to_path_buf())
}

/// Process local store, used for tests and headless runs
#[derive(Clone, Default)]
pub struct MemoryStore {
    items: Arc<Mutex<HashMap<String, String>>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Default::default()
        }
    }

    pub fn with_items<K: Into<String>, V: Into<String>>(
        items: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let items = items
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            items: Arc::new(Mutex::new(items)),
            read_only: false,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.items
            .lock()
            .map_err(|e| StorageError::Poisoned(format!("{e:?}")))
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("items", &self.lock().map(|m| m.len()).unwrap_or_default())
            .field("read_only", &self.read_only)
            .finish()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::ReadOnly(key.to_string()));
        }
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::ReadOnly(key.to_string()));
        }
        self.lock()?.remove(key);
        Ok(())
    }
}
