//! # rulesynth-app
//!
//! Application use cases: catalog merge, merged-catalog cache, rule
//! synthesis, and catalog export.
//! This crate depends on `ports`, `domain`, and `shared`.

pub mod cache;
pub mod export;
pub mod merge;
pub mod synthesize;

pub use cache::{DEFAULT_CACHE_TTL, MergedCatalogCache};
pub use export::{ExportCatalogDeps, ExportCatalogInput, export_catalog};
pub use merge::{CatalogSources, MergeCatalogsDeps, load_merged_catalog, merge_catalog_files};
pub use synthesize::{
    SynthesizeDeps, SynthesizeInput, describe_warnings, select_matching_rules, synthesize,
};

/// Returns the app crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulesynth_domain::domain_crate_version;
    use rulesynth_ports::ports_crate_version;
    use rulesynth_shared::shared_crate_version;

    #[test]
    fn app_crate_compiles() {
        assert!(!app_crate_version().is_empty());
        assert!(!domain_crate_version().is_empty());
        assert!(!ports_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }
}
