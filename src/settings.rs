//! Persisted backup settings.
//!
//! One flat settings document, loaded and saved through a [`SettingsStore`]
//! that callers inject so the persistence target stays explicit. Concurrent
//! resolutions against the same store are last-writer-wins; callers that need
//! stronger guarantees must serialize access themselves.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Base directory under which all per-user backup trees live.
    #[serde(default)]
    pub backup_location_root: PathBuf,

    /// Database server the backups are taken from. Empty string means unset.
    #[serde(default)]
    pub database_server_name: String,

    /// Database to back up. Empty string means unset.
    #[serde(default)]
    pub database_name: String,
}

impl Settings {
    /// True when no database server has been configured yet.
    pub fn database_server_unset(&self) -> bool {
        self.database_server_name.trim().is_empty()
    }
}

pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for &T {
    fn load(&self) -> Result<Settings> {
        (**self).load()
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        (**self).save(settings)
    }
}

/// Settings persisted as a TOML file. A missing file loads as defaults;
/// saving creates missing parent directories and writes synchronously.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string_pretty(settings)?)?;
        Ok(())
    }
}

/// In-memory store for tests and embedding callers that manage persistence
/// elsewhere. Tracks how many times `save` was called.
#[derive(Default)]
pub struct MemorySettingsStore {
    inner: Mutex<Settings>,
    saves: Mutex<usize>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Mutex::new(settings),
            saves: Mutex::new(0),
        }
    }

    pub fn current(&self) -> Settings {
        self.inner.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings> {
        Ok(self.inner.lock().unwrap().clone())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.inner.lock().unwrap() = settings.clone();
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}
