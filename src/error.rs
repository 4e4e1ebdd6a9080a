use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Couldn't find a folder to save data")]
    NoDataDirectory,
    #[error("Storage is read only, can't write {0}")]
    ReadOnly(String),
    #[error("Storage lock poisoned: {0}")]
    Poisoned(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No user is logged in")]
    NotLoggedIn,
    #[error("Unknown user {0}")]
    UnknownUser(String),
    #[error(transparent)]
    Validation(#[from] crate::validation::ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Could not serialize value: {0}")]
    Serialization(#[from] serde_json::Error),
}
