//! Select the catalog rules a project actually needs.

use crate::cache::MergedCatalogCache;
use crate::merge::{CatalogSources, MergeCatalogsDeps, load_merged_catalog};
use rulesynth_domain::{Catalog, MatchResult, ProjectPathSet};
use rulesynth_ports::{
    CatalogStorePort, LogLevel, LoggerPort, PatternMatcherPort, ProjectScannerPort, log_fields,
};
use rulesynth_shared::{ErrorEnvelope, Outcome};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Input payload for synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizeInput {
    /// Project root to scan (already resolved by the caller).
    pub project_root: PathBuf,
    /// Catalog locations.
    pub sources: CatalogSources,
}

/// Dependencies required by synthesis.
#[derive(Clone)]
pub struct SynthesizeDeps {
    /// Project tree scanner.
    pub scanner: Arc<dyn ProjectScannerPort>,
    /// Pattern matcher.
    pub matcher: Arc<dyn PatternMatcherPort>,
    /// Catalog file reader.
    pub catalogs: Arc<dyn CatalogStorePort>,
    /// Optional merged-catalog cache.
    pub cache: Option<Arc<MergedCatalogCache>>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

impl SynthesizeDeps {
    /// Dependencies for the merge step.
    #[must_use]
    pub fn merge_deps(&self) -> MergeCatalogsDeps {
        MergeCatalogsDeps {
            catalogs: Arc::clone(&self.catalogs),
            logger: self.logger.clone(),
        }
    }
}

/// Build the per-project match result.
///
/// The merged catalog is obtained first, then the tree is scanned. Warnings
/// from both steps are carried on the outcome in that order.
#[tracing::instrument(
    name = "rulesynth.synthesize",
    skip_all,
    fields(root = %input.project_root.display())
)]
pub fn synthesize(deps: &SynthesizeDeps, input: &SynthesizeInput) -> Outcome<MatchResult> {
    let started_at = Instant::now();
    let logger = deps.logger.as_deref();

    let (catalog, mut warnings) = match load_merged_catalog(
        &deps.merge_deps(),
        deps.cache.as_deref(),
        &input.sources,
    )
    .into_result()
    {
        Ok(parts) => parts,
        Err(error) => return Outcome::Fatal(error),
    };

    let (paths, scan_warnings) = match deps.scanner.scan(&input.project_root).into_result() {
        Ok(parts) => parts,
        Err(error) => {
            if let Some(logger) = logger {
                logger.log_envelope("scan.root_failed", LogLevel::Error, &error);
            }
            return Outcome::Fatal(error);
        },
    };
    if let Some(logger) = logger {
        for warning in &scan_warnings {
            logger.log_envelope("scan.dir_read_failed", LogLevel::Warn, warning);
        }
    }
    warnings.extend(scan_warnings);

    let matches = select_matching_rules(&catalog, &paths, deps.matcher.as_ref());

    if let Some(logger) = logger {
        let elapsed_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        logger.info(
            "synthesize.completed",
            "Rule synthesis completed",
            Some(log_fields([
                (
                    "projectRoot",
                    serde_json::Value::from(input.project_root.display().to_string()),
                ),
                ("paths", paths.len().into()),
                ("categories", matches.categories_count().into()),
                ("rules", matches.total_rules().into()),
                ("warnings", warnings.len().into()),
                ("durationMs", elapsed_ms.into()),
            ])),
        );
    }

    Outcome::from_parts(matches, warnings)
}

/// Keep, per category and in catalog order, the patterns that match at least
/// one path. Categories without matches are omitted.
pub fn select_matching_rules(
    catalog: &Catalog,
    paths: &ProjectPathSet,
    matcher: &dyn PatternMatcherPort,
) -> MatchResult {
    let mut result = MatchResult::new();
    for category in catalog {
        let matching = category
            .patterns
            .iter()
            .filter(|pattern| matcher.matches(pattern, paths))
            .cloned()
            .collect();
        result.push(category.name.clone(), matching);
    }
    result
}

/// Convenience: warnings rendered as `code: message` lines.
pub fn describe_warnings(warnings: &[ErrorEnvelope]) -> Vec<String> {
    warnings
        .iter()
        .map(|warning| format!("{}: {}", warning.code, warning.message))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulesynth_domain::{Category, CategoryName, Pattern};

    struct SuffixMatcher;

    impl PatternMatcherPort for SuffixMatcher {
        fn matches(&self, pattern: &Pattern, paths: &ProjectPathSet) -> bool {
            let suffix = pattern.key().trim_start_matches('*');
            paths.iter().any(|path| path.as_str().ends_with(suffix))
        }
    }

    fn catalog(entries: &[(&str, &[&str])]) -> Catalog {
        let categories = entries
            .iter()
            .map(|(name, patterns)| {
                Category::new(
                    CategoryName::new(*name).unwrap_or_else(|_| unreachable!()),
                    patterns.iter().copied().map(Pattern::from).collect(),
                )
            })
            .collect();
        Catalog::new(categories).unwrap_or_default()
    }

    #[test]
    fn omits_categories_without_matches() {
        let catalog = catalog(&[
            ("Rust", &["*.rs"]),
            ("Python", &["*.pyc", "*.py"]),
            ("Logs", &["*.log"]),
        ]);
        let paths: ProjectPathSet = ["main.py", "notes.log"].into_iter().collect();

        let result = select_matching_rules(&catalog, &paths, &SuffixMatcher);
        let names: Vec<&str> = result.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Python", "Logs"]);
        assert!(result.get("Rust").is_none());
        assert_eq!(
            result.get("Python").map(|p| p.iter().map(Pattern::as_str).collect::<Vec<_>>()),
            Some(vec!["*.py"])
        );
    }

    #[test]
    fn empty_project_yields_empty_result() {
        let catalog = catalog(&[("Python", &["*.py"])]);
        let result = select_matching_rules(&catalog, &ProjectPathSet::new(), &SuffixMatcher);
        assert!(result.is_empty());
        assert_eq!(result.total_rules(), 0);
    }

    #[test]
    fn warnings_render_with_codes() {
        let warning = ErrorEnvelope::expected(
            rulesynth_shared::ErrorCode::user_catalog_ignored(),
            "user catalog ignored",
        );
        assert_eq!(
            describe_warnings(&[warning]),
            vec!["catalog:user_catalog_ignored: user catalog ignored"]
        );
    }
}
