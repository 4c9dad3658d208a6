//! Catalog file boundary contract.

use rulesynth_domain::Catalog;
use rulesynth_shared::{ErrorEnvelope, Result};
use std::path::Path;

/// A catalog read from disk, plus the entries that had to be skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCatalog {
    /// Valid categories in file order.
    pub catalog: Catalog,
    /// One warning per skipped category entry.
    pub skipped: Vec<ErrorEnvelope>,
}

/// Boundary contract for reading and rendering catalog files.
pub trait CatalogStorePort: Send + Sync {
    /// Read and parse a catalog file.
    ///
    /// Returns `Ok(None)` when the file does not exist. Unreadable files are
    /// I/O errors; malformed text is a `catalog:parse` error.
    fn load(&self, path: &Path) -> Result<Option<ParsedCatalog>>;

    /// Render a catalog in the same text format `load` accepts.
    fn render(&self, catalog: &Catalog) -> Result<String>;
}
