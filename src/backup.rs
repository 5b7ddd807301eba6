//! Timestamped backups of mutable files
//!
//! Every backup made by one run shares a single tag, so a run snapshots each
//! file at most once and re-runs produce distinctly named artifacts.

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Backup suffix for one pipeline run. Computed once at pipeline start and
/// passed by reference into every backup call.
#[derive(Debug, Clone)]
pub struct BackupTag(String);

impl BackupTag {
    /// Tag from the current local time.
    pub fn now() -> Self {
        Self(Local::now().format("%Y%m%d-%H%M%S").to_string())
    }

    /// The filename suffix appended to backed-up files.
    pub fn suffix(&self) -> String {
        format!(".backup-{}", self.0)
    }
}

/// Copy `path` to `<path>.backup-<tag>` if it exists. Returns the backup
/// path, or `None` when there was nothing to back up. The backup is a
/// byte-for-byte copy, never read back by the pipeline.
pub fn backup_file(path: &Path, tag: &BackupTag) -> Result<Option<PathBuf>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(tag.suffix());
    let backup = PathBuf::from(name);
    fs::copy(path, &backup)
        .map_err(|e| format!("Could not back up {}: {}", path.display(), e))?;
    Ok(Some(backup))
}
