//! Backup-on-write file writer.

use rulesynth_ports::{FileWriterPort, WriteOutcome};
use rulesynth_shared::{ErrorEnvelope, Result, ResultExt};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix appended to the original file name for the backup copy.
pub const BACKUP_SUFFIX: &str = ".backup";

/// Writer that never overwrites different content without a backup.
///
/// Parent directories are created on demand.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackupFileWriter;

impl BackupFileWriter {
    /// Build a writer.
    pub const fn new() -> Self {
        Self
    }
}

/// Sibling backup location for `path` (`rules.toml` -> `rules.toml.backup`).
#[must_use]
pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(BACKUP_SUFFIX);
    path.with_file_name(name)
}

impl FileWriterPort for BackupFileWriter {
    fn write_with_backup(&self, path: &Path, content: &str) -> Result<WriteOutcome> {
        let display = path.display().to_string();

        let existing = match fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => {
                return Err(ErrorEnvelope::from(error).with_metadata("path", display));
            },
        };

        let Some(existing) = existing else {
            if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(ErrorEnvelope::from)
                    .with_metadata("path", parent.display().to_string())?;
            }
            fs::write(path, content)
                .map_err(ErrorEnvelope::from)
                .with_metadata("path", display)?;
            return Ok(WriteOutcome::Created);
        };

        if existing.trim() == content.trim() {
            return Ok(WriteOutcome::Unchanged);
        }

        let backup_path = backup_path_for(path);
        fs::write(&backup_path, &existing)
            .map_err(ErrorEnvelope::from)
            .with_metadata("path", backup_path.display().to_string())
            .with_metadata("stage", "backup")?;
        fs::write(path, content)
            .map_err(ErrorEnvelope::from)
            .with_metadata("path", display)?;
        tracing::debug!(backup = %backup_path.display(), "previous content backed up");
        Ok(WriteOutcome::Updated { backup_path })
    }
}
