//! Merge the baseline catalog with an optional user overlay.
//!
//! Only the baseline is load-bearing. Everything that goes wrong with the user
//! catalog, or with individual categories, is recovered from and reported as a
//! warning on the returned [`Outcome`].

use crate::cache::MergedCatalogCache;
use rulesynth_domain::{Catalog, merge_catalogs};
use rulesynth_ports::{CatalogStorePort, LogLevel, LoggerPort, log_fields};
use rulesynth_shared::{ErrorCode, ErrorEnvelope, Outcome};
use std::path::PathBuf;
use std::sync::Arc;

/// Where the two catalogs live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSources {
    /// Baseline catalog (required).
    pub baseline_path: PathBuf,
    /// User catalog (optional; a missing file is not an error).
    pub user_path: Option<PathBuf>,
}

/// Dependencies required by the merge use case.
#[derive(Clone)]
pub struct MergeCatalogsDeps {
    /// Catalog file reader.
    pub catalogs: Arc<dyn CatalogStorePort>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Load both catalogs and merge them, user patterns first.
#[tracing::instrument(
    name = "rulesynth.merge_catalog_files",
    skip_all,
    fields(baseline = %input.baseline_path.display(), has_user = input.user_path.is_some())
)]
pub fn merge_catalog_files(deps: &MergeCatalogsDeps, input: &CatalogSources) -> Outcome<Catalog> {
    let logger = deps.logger.as_deref();
    let baseline_source = input.baseline_path.display().to_string();

    let baseline = match deps.catalogs.load(&input.baseline_path) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            let error = ErrorEnvelope::expected(
                ErrorCode::baseline_unavailable(),
                "baseline catalog not found",
            )
            .with_metadata("path", baseline_source);
            return fatal(logger, error);
        },
        Err(error) => {
            let cause = error.code.to_string();
            let error = error
                .with_code(ErrorCode::baseline_unavailable())
                .with_metadata("cause", cause);
            return fatal(logger, error);
        },
    };

    let mut warnings = baseline.skipped;
    let baseline = baseline.catalog;

    let Some(user_path) = input.user_path.as_ref() else {
        return finish(logger, baseline, warnings);
    };
    let user_source = user_path.display().to_string();

    let user = match deps.catalogs.load(user_path) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            if let Some(logger) = logger {
                logger.debug(
                    "catalog.merge.user_absent",
                    "No user catalog found; using baseline only",
                    Some(log_fields([("path", user_source)])),
                );
            }
            return finish(logger, baseline, warnings);
        },
        Err(error) => {
            let cause = error.code.to_string();
            let warning = ErrorEnvelope::expected(
                ErrorCode::user_catalog_ignored(),
                format!("user catalog ignored: {}", error.message),
            )
            .with_metadata("path", user_source)
            .with_metadata("cause", cause);
            if let Some(logger) = logger {
                logger.log_envelope("catalog.merge.user_invalid", LogLevel::Warn, &warning);
            }
            warnings.push(warning);
            return finish(logger, baseline, warnings);
        },
    };

    warnings.extend(user.skipped);
    match merge_catalogs(&baseline, &user.catalog) {
        Ok(merged) => finish(logger, merged, warnings),
        Err(error) => {
            let warning = ErrorEnvelope::from(error).with_metadata("path", user_source);
            if let Some(logger) = logger {
                logger.log_envelope(
                    "catalog.merge.validation_failed",
                    LogLevel::Warn,
                    &warning,
                );
            }
            warnings.push(warning);
            finish(logger, baseline, warnings)
        },
    }
}

/// Return the merged catalog, reusing the cache when one is provided.
pub fn load_merged_catalog(
    deps: &MergeCatalogsDeps,
    cache: Option<&MergedCatalogCache>,
    input: &CatalogSources,
) -> Outcome<Catalog> {
    match cache {
        Some(cache) => cache.get_or_compute(|| merge_catalog_files(deps, input)),
        None => merge_catalog_files(deps, input),
    }
}

fn fatal(logger: Option<&dyn LoggerPort>, error: ErrorEnvelope) -> Outcome<Catalog> {
    if let Some(logger) = logger {
        logger.log_envelope("catalog.baseline_unavailable", LogLevel::Error, &error);
    }
    Outcome::Fatal(error)
}

fn finish(
    logger: Option<&dyn LoggerPort>,
    catalog: Catalog,
    warnings: Vec<ErrorEnvelope>,
) -> Outcome<Catalog> {
    if let Some(logger) = logger {
        for warning in warnings
            .iter()
            .filter(|warning| warning.code == ErrorCode::category_skipped())
        {
            logger.log_envelope("catalog.category_skipped", LogLevel::Warn, warning);
        }
        logger.debug(
            "catalog.merge.completed",
            "Catalog merge completed",
            Some(log_fields([
                ("categories", catalog.len()),
                ("patterns", catalog.total_patterns()),
                ("warnings", warnings.len()),
            ])),
        );
    }
    Outcome::from_parts(catalog, warnings)
}
