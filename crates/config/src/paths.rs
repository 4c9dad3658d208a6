//! Catalog and project-root path resolution.

use crate::env::SynthEnv;
use crate::schema::SynthConfig;
use rulesynth_shared::{ErrorEnvelope, ResultExt};
use std::path::{Path, PathBuf};

/// File name of the catalog shipped next to the binary.
pub const CATALOG_FILE_NAME: &str = "gitignore_catalog.toml";
/// Directory under the platform config dir that holds the user catalog.
pub const APP_CONFIG_DIR: &str = "rulesynth";

/// Baseline catalog beside the running executable.
///
/// Falls back to a path relative to the working directory when the
/// executable location is unknown.
#[must_use]
pub fn default_baseline_catalog_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CATALOG_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(CATALOG_FILE_NAME))
}

/// User catalog under the platform config directory, when one exists.
#[must_use]
pub fn default_user_catalog_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_CONFIG_DIR).join(CATALOG_FILE_NAME))
}

/// Resolved catalog locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPaths {
    /// Baseline catalog (must exist at run time).
    pub baseline: PathBuf,
    /// User catalog (may be absent on disk).
    pub user: Option<PathBuf>,
}

impl CatalogPaths {
    /// Resolve configured paths, filling gaps with platform defaults.
    #[must_use]
    pub fn resolve(config: &SynthConfig) -> Self {
        Self {
            baseline: config
                .catalog
                .baseline_path
                .clone()
                .unwrap_or_else(default_baseline_catalog_path),
            user: config
                .catalog
                .user_path
                .clone()
                .or_else(default_user_catalog_path),
        }
    }

    /// Replace either path with an explicit override.
    #[must_use]
    pub fn with_overrides(mut self, baseline: Option<&Path>, user: Option<&Path>) -> Self {
        if let Some(path) = baseline {
            self.baseline = path.to_path_buf();
        }
        if let Some(path) = user {
            self.user = Some(path.to_path_buf());
        }
        self
    }
}

/// Pick the project root: explicit argument, then `PROJECT_PATH`, then the
/// current working directory.
pub fn resolve_project_root(
    explicit: Option<&Path>,
    env: &SynthEnv,
) -> Result<PathBuf, ErrorEnvelope> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }
    if let Some(root) = &env.project_path {
        tracing::debug!(root = %root.display(), "project root taken from PROJECT_PATH");
        return Ok(root.clone());
    }
    std::env::current_dir()
        .map_err(ErrorEnvelope::from)
        .with_metadata("source", "current_dir")
}
