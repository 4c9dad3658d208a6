//! # rulesynth-adapters
//!
//! Adapter implementations for ports (tree scanning, glob matching, TOML
//! catalogs, backup-on-write, clock, structured logging).
//! This crate depends on `ports`, `domain`, and `shared`.

pub mod backup;
pub mod catalog_toml;
pub mod clock;
pub mod fs;
pub mod glob;
pub mod log_sink;
pub mod logger;

pub use backup::{BACKUP_SUFFIX, BackupFileWriter, backup_path_for};
pub use catalog_toml::{TomlCatalogStore, category_description, parse_catalog, render_catalog};
pub use clock::SystemClock;
pub use fs::LocalTreeScanner;
pub use glob::GlobPatternMatcher;
pub use log_sink::{LogSink, MemoryLogSink, StderrLogSink};
pub use logger::JsonLogger;

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
