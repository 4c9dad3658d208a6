//! Build use-case dependencies from the effective configuration.

use rulesynth_adapters::{
    BackupFileWriter, GlobPatternMatcher, JsonLogger, LocalTreeScanner, StderrLogSink,
    SystemClock, TomlCatalogStore,
};
use rulesynth_app::{
    CatalogSources, ExportCatalogDeps, MergeCatalogsDeps, MergedCatalogCache, SynthesizeDeps,
};
use rulesynth_config::{
    CatalogPaths, LogLevelSetting, SynthEnv, ValidatedSynthConfig, load_synth_config_from_path,
};
use rulesynth_ports::{LogLevel, LoggerPort, log_fields};
use rulesynth_shared::ErrorEnvelope;
use std::path::Path;
use std::sync::Arc;

/// Env var holding a `tracing` filter directive; tracing output is off when unset.
pub const TRACE_ENV: &str = "RULESYNTH_TRACE";

/// Everything a command needs beyond its own arguments.
pub struct Runtime {
    pub config: ValidatedSynthConfig,
    pub env: SynthEnv,
    pub logger: Arc<dyn LoggerPort>,
    catalogs: Arc<TomlCatalogStore>,
}

impl Runtime {
    /// Read env and config file, then set up the structured logger.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ErrorEnvelope> {
        let env = SynthEnv::from_std_env().map_err(ErrorEnvelope::from)?;
        let config = load_synth_config_from_path(config_path, &env)?;
        let logger: Arc<dyn LoggerPort> = Arc::new(
            JsonLogger::new(Arc::new(StderrLogSink))
                .with_min_level(log_level(config.log_level()))
                .with_base_fields(log_fields([("app", env!("CARGO_PKG_NAME"))])),
        );
        Ok(Self {
            config,
            env,
            logger,
            catalogs: Arc::new(TomlCatalogStore::new()),
        })
    }

    /// Catalog locations after config, env and flag overrides.
    pub fn catalog_sources(&self, baseline: Option<&Path>, user: Option<&Path>) -> CatalogSources {
        let paths = CatalogPaths::resolve(self.config.as_ref()).with_overrides(baseline, user);
        CatalogSources {
            baseline_path: paths.baseline,
            user_path: paths.user,
        }
    }

    pub fn merge_deps(&self) -> MergeCatalogsDeps {
        MergeCatalogsDeps {
            catalogs: self.catalogs.clone(),
            logger: Some(Arc::clone(&self.logger)),
        }
    }

    pub fn synthesize_deps(&self) -> SynthesizeDeps {
        let cache = self.config.cache_enabled().then(|| {
            Arc::new(MergedCatalogCache::new(
                Arc::new(SystemClock),
                self.config.cache_ttl(),
            ))
        });
        SynthesizeDeps {
            scanner: Arc::new(LocalTreeScanner::new()),
            matcher: Arc::new(GlobPatternMatcher::new()),
            catalogs: self.catalogs.clone(),
            cache,
            logger: Some(Arc::clone(&self.logger)),
        }
    }

    pub fn export_deps(&self) -> ExportCatalogDeps {
        ExportCatalogDeps {
            catalogs: self.catalogs.clone(),
            writer: Arc::new(BackupFileWriter::new()),
            logger: Some(Arc::clone(&self.logger)),
        }
    }

    pub fn catalog_store(&self) -> &TomlCatalogStore {
        &self.catalogs
    }
}

const fn log_level(setting: LogLevelSetting) -> LogLevel {
    match setting {
        LogLevelSetting::Debug => LogLevel::Debug,
        LogLevelSetting::Info => LogLevel::Info,
        LogLevelSetting::Warn => LogLevel::Warn,
        LogLevelSetting::Error => LogLevel::Error,
    }
}

/// Install the stderr `tracing` subscriber when `RULESYNTH_TRACE` is set.
pub fn init_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let Ok(filter) = EnvFilter::try_from_env(TRACE_ENV) else {
        return;
    };
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .try_init();
}
