//! # rulesynth-config
//!
//! Configuration schema, env overrides, and catalog path resolution for the
//! CLI. This crate depends on `domain` and `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file).
pub mod load;
/// Catalog and project-root path resolution.
pub mod paths;
/// Configuration schema types and helpers.
pub mod schema;

pub use env::{
    ENV_BASELINE_CATALOG, ENV_CACHE_ENABLED, ENV_CACHE_TTL_SECS, ENV_LOG_LEVEL, ENV_PROJECT_PATH,
    ENV_USER_CATALOG, EnvParseError, SynthEnv, apply_env_overrides,
};
pub use load::{
    load_synth_config_from_path, load_synth_config_std_env, to_pretty_json, to_pretty_toml,
};
pub use paths::{
    APP_CONFIG_DIR, CATALOG_FILE_NAME, CatalogPaths, default_baseline_catalog_path,
    default_user_catalog_path, resolve_project_root,
};
pub use schema::{
    CACHE_TTL_MAX_SECS, CACHE_TTL_MIN_SECS, CURRENT_CONFIG_VERSION, CacheConfig, CatalogConfig,
    ConfigSchemaError, DEFAULT_CACHE_TTL_SECS, LogLevelSetting, LoggingConfig, SynthConfig,
    ValidatedSynthConfig, parse_synth_config_json, parse_synth_config_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
