//! File persistence boundary contract.

use rulesynth_shared::Result;
use std::path::{Path, PathBuf};

/// What a backup-aware write did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file did not exist and was created.
    Created,
    /// The file existed with different content; the old content was saved first.
    Updated {
        /// Where the previous content was copied.
        backup_path: PathBuf,
    },
    /// The file already held the same content; nothing was written.
    Unchanged,
}

/// Boundary contract for writes that never lose the previous version.
pub trait FileWriterPort: Send + Sync {
    /// Write `content` to `path`, copying differing old content to a backup first.
    fn write_with_backup(&self, path: &Path, content: &str) -> Result<WriteOutcome>;
}
