//! Custom error types for the locator.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid master.config XML: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("master.config has no '{0}' entry")]
    MissingConfigKey(String),

    #[error("Settings file error: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("Settings file error: {0}")]
    SettingsSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, LocatorError>;
