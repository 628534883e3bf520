//! Directory and naming utilities shared with the backup executor.

use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

const BACKUP_FILE_EXTENSION: &str = ".bak";

/// Creates the directory and any missing ancestors. No-op when it already
/// exists.
pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Most recently created immediate subdirectory of `root`, or `None` when the
/// root is empty or does not exist. Creation-time ties keep listing order,
/// which the filesystem does not guarantee.
pub fn last_backup_folder(root: &Path) -> Result<Option<PathBuf>> {
    if !root.is_dir() {
        return Ok(None);
    }

    let mut folders = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            folders.push((entry.metadata()?.created()?, entry.path()));
        }
    }

    folders.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(folders.into_iter().next().map(|(_, path)| path))
}

/// Canonical backup file name: `{yyyy-MM-dd_HHmmss}_v.{version}{.diff|.full}.bak`.
/// Downstream restoration and retention tooling parses this format, so it is
/// a compatibility contract.
pub fn backup_file_name(
    database_version: &str,
    is_incremental: bool,
    timestamp: NaiveDateTime,
) -> String {
    let kind = if is_incremental { ".diff" } else { ".full" };
    format!(
        "{}_v.{database_version}{kind}{BACKUP_FILE_EXTENSION}",
        timestamp.format("%Y-%m-%d_%H%M%S")
    )
}

/// Directory containing the running executable.
pub fn own_directory() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "executable has no parent directory",
        )
        .into()
    })
}
