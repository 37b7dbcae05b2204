use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// `<path>.bak`, next to the original.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

pub fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Copy `path` to its backup, replacing any previous one.
pub fn backup(path: &Path) -> Result<PathBuf> {
    let backup = backup_path(path);
    fs::copy(path, &backup).with_context(|| {
        format!(
            "Failed to back up {} to {}",
            path.display(),
            backup.display()
        )
    })?;
    tracing::info!("Backed up {} to {}", path.display(), backup.display());
    Ok(backup)
}

/// Back up `path`, then overwrite it with `content`. Not atomic: a crash
/// after the backup can leave a truncated file, the backup is the only copy.
pub fn write_with_backup(path: &Path, content: &str) -> Result<PathBuf> {
    let backup = backup(path)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Rewrote {}", path.display());
    Ok(backup)
}

/// Copy the backup over `path`. Returns `false` when there is no backup.
pub fn restore(path: &Path) -> Result<bool> {
    let backup = backup_path(path);
    if !backup.exists() {
        tracing::warn!("No backup at {}", backup.display());
        return Ok(false);
    }
    fs::copy(&backup, path).with_context(|| {
        format!(
            "Failed to restore {} from {}",
            path.display(),
            backup.display()
        )
    })?;
    tracing::info!("Restored {} from {}", path.display(), backup.display());
    Ok(true)
}
