//! Legacy PMS `master.config` discovery.
//!
//! When no database server is configured, the known historical install
//! locations of the practice-management product are probed for its XML
//! settings file and the connection values are lifted out of it.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LocatorError, Result};

/// Known install locations, probed in this order. First existing file wins.
pub const MASTER_CONFIG_CANDIDATES: [&str; 3] = [
    r"C:\Program Files\Advanced Legal\ALB\PMS\master.config",
    r"C:\Program Files\IRISLaw\PMS\master.config",
    r"C:\Program Files (x86)\Advanced Legal\ALB\PMS\master.config",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterConfig {
    pub server_name: String,
    pub database_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "appSettings")]
struct AppSettings {
    #[serde(rename = "add", default)]
    entries: Vec<AddEntry>,
}

#[derive(Debug, Deserialize)]
struct AddEntry {
    #[serde(rename = "@key")]
    key: String,
    #[serde(rename = "@value")]
    value: String,
}

/// Probes the candidates in order and parses the first one that exists.
/// Values from later candidates are never merged in. Returns `Ok(None)` when
/// no candidate is present.
pub fn discover(candidates: &[PathBuf]) -> Result<Option<MasterConfig>> {
    for candidate in candidates {
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "found master.config");
            return parse_file(candidate).map(Some);
        }
    }
    Ok(None)
}

pub fn parse_file(path: &Path) -> Result<MasterConfig> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}

fn parse(xml: &str) -> Result<MasterConfig> {
    let document: AppSettings = quick_xml::de::from_str(xml)?;
    let value_of = |key: &str| {
        document
            .entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.clone())
            .ok_or_else(|| LocatorError::MissingConfigKey(key.to_string()))
    };
    Ok(MasterConfig {
        server_name: value_of("ServerName")?,
        database_name: value_of("DatabaseName")?,
    })
}
