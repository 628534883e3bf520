//! Backup location resolution for database backups.
//!
//! Resolves where backup artifacts belong on a per-user, per-database-server
//! basis, discovers the legacy PMS `master.config` when explicit settings are
//! absent, and produces canonical backup file names and latest-backup lookups.

pub mod environment;
pub mod error;
pub mod locator;
pub mod master_config;
pub mod paths;
pub mod settings;

// Re-export commonly used types
pub use environment::{Environment, SystemEnvironment};
pub use error::{LocatorError, Result};
pub use locator::{BackupLocator, BackupPaths};
pub use settings::{FileSettingsStore, MemorySettingsStore, Settings, SettingsStore};
