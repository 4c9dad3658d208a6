//! Project tree scanning boundary contract.

use rulesynth_domain::ProjectPathSet;
use rulesynth_shared::Outcome;
use std::path::Path;

/// Boundary contract for enumerating a project tree.
///
/// Implementations record every file and directory under `root` (directories
/// with a trailing `/`), never follow symbolic links, and never yield paths
/// outside `root`.
pub trait ProjectScannerPort: Send + Sync {
    /// Scan `root`.
    ///
    /// A missing or unreadable root is `Fatal`. Entries that cannot be read
    /// mid-walk are skipped and reported as warnings on a `Degraded` outcome.
    fn scan(&self, root: &Path) -> Outcome<ProjectPathSet>;
}
