//! # rulesynth-domain
//!
//! Domain value objects for ignore-rule synthesis.
//!
//! - **Patterns** - `Pattern`, comment-insensitive keys, `dedupe_patterns`
//! - **Catalogs** - `Category`, `Catalog`, `merge_catalogs`
//! - **Paths** - `ProjectPath`, `ProjectPathSet`
//! - **Matches** - `MatchResult`
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - No infrastructure or adapter dependencies
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub use rulesynth_shared::shared_crate_version;

pub mod catalog;
pub mod matches;
pub mod paths;
pub mod pattern;

pub use catalog::{Catalog, CatalogError, Category, CategoryName, merge_catalogs};
pub use matches::{CategoryMatches, MatchResult};
pub use paths::{ProjectPath, ProjectPathSet, SEPARATOR, normalize_separators};
pub use pattern::{COMMENT_MARKER, Pattern, dedupe_patterns, pattern_key};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_crate_compiles() {
        let version = domain_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn domain_depends_on_shared() {
        let shared_version = shared_crate_version();
        assert!(!shared_version.is_empty());
    }
}
