use std::path::PathBuf;

use thiserror::Error;

use crate::models::state::AppState;

pub mod json;
pub mod migrations;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to load state from '{path}': {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON from '{path}': {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to save state to '{path}': {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize state to JSON: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to create backup at '{path}': {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to cleanup old backups in '{dir}': {source}")]
    CleanupFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "State file was created by a newer version of tdm (version {0}). Please upgrade tdm to open this file."
    )]
    FutureVersion(u32),

    #[error("State file has unsupported version {0}. This version of tdm cannot read this file.")]
    UnsupportedVersion(u32),
}

/// Durable key-value persistence for the whole application state: one blob,
/// loaded at startup and fully overwritten on every change.
pub trait Storage {
    fn load(&self) -> Result<AppState, StorageError>;
    fn save(&self, state: &AppState) -> Result<(), StorageError>;
}
