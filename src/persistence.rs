//! Best-effort persistence of the preference record
//!
//! Storage is a capability that may be missing or failing. `try_load` and
//! `try_save` report that explicitly; `load` and `save` are the degrading
//! facade the rest of the crate uses, and never fail outward.

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Configuration, RecordError};
use crate::constants::storage;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence unavailable")]
    Unavailable,

    #[error(transparent)]
    Malformed(#[from] RecordError),

    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

/// Storage capability for the single preference record
pub trait ConfigStore {
    /// Raw persisted text; `Ok(None)` when no record exists yet
    fn read_record(&self) -> Result<Option<String>, StoreError>;

    /// Replace the persisted text
    fn write_record(&self, contents: &str) -> Result<(), StoreError>;

    /// Persisted configuration, or `None` if unavailable, missing or malformed
    fn try_load(&self) -> Option<Configuration> {
        let contents = match self.read_record() {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                info!("No stored filter config found");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Could not read stored filter config");
                return None;
            }
        };

        match Configuration::decode(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(error = %e, "Discarding malformed filter config");
                None
            }
        }
    }

    /// Returns whether the record reached storage
    fn try_save(&self, config: &Configuration) -> bool {
        let result = config
            .encode()
            .map_err(StoreError::from)
            .and_then(|contents| self.write_record(&contents));
        match result {
            Ok(()) => true,
            Err(StoreError::Unavailable) => {
                debug!("Persistence unavailable, keeping filter config in memory only");
                false
            }
            Err(e) => {
                warn!(error = %e, "Failed to save filter config");
                false
            }
        }
    }

    /// Stored configuration or the built-in default
    fn load(&self) -> Configuration {
        self.try_load().unwrap_or_else(|| {
            let config = Configuration::default();
            info!(config = ?config, "Using default filter config");
            config
        })
    }

    fn save(&self, config: &Configuration) {
        let _ = self.try_save(config);
    }
}

/// Record stored as a JSON file in the per-user config directory
#[derive(Debug, Clone)]
pub struct FileStore {
    path: Option<PathBuf>,
}

impl FileStore {
    /// Default location, honouring the path override environment variable
    pub fn new() -> Self {
        Self::with_override(std::env::var_os(storage::STORE_PATH_ENV))
    }

    /// Override path if set and non-empty, default location otherwise
    fn with_override(path: Option<OsString>) -> Self {
        match path {
            Some(path) if !path.is_empty() => Self::at(PathBuf::from(path)),
            _ => Self {
                path: Self::default_path(),
            },
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A store with nowhere to write; every operation degrades
    pub fn unavailable() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push(storage::APP_DIR);
        path.push(format!("{}.{}", storage::STORAGE_KEY, storage::FILE_EXTENSION));
        Some(path)
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileStore {
    fn read_record(&self) -> Result<Option<String>, StoreError> {
        let path = self.path.as_ref().ok_or(StoreError::Unavailable)?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read filter config from {}", path.display()))?;
        Ok(Some(contents))
    }

    fn write_record(&self, contents: &str) -> Result<(), StoreError> {
        let path = self.path.as_ref().ok_or(StoreError::Unavailable)?;
        write_file(path, contents)?;
        debug!(path = %path.display(), "Saved filter config");
        Ok(())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, contents)
        .with_context(|| format!("Failed to write filter config to {}", path.display()))?;
    Ok(())
}

/// Session-only storage; contents are lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with raw record text, e.g. a legacy record
    pub fn with_record(contents: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(contents.into())),
            unavailable: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            slot: RefCell::new(None),
            unavailable: true,
        }
    }

    /// Exact persisted text
    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl ConfigStore for MemoryStore {
    fn read_record(&self) -> Result<Option<String>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        Ok(self.slot.borrow().clone())
    }

    fn write_record(&self, contents: &str) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        *self.slot.borrow_mut() = Some(contents.to_string());
        Ok(())
    }
}
