//! Configuration schema types and helpers.
//!
//! The serialized shape is camelCase and rejects unknown fields so typos in a
//! config file surface as errors instead of silently falling back to defaults.

use rulesynth_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Current config schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Default merged-catalog cache lifetime (seconds).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
/// Minimum cache lifetime (seconds).
pub const CACHE_TTL_MIN_SECS: u64 = 1;
/// Maximum cache lifetime (seconds).
pub const CACHE_TTL_MAX_SECS: u64 = 86_400;

/// Root rulesynth configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SynthConfig {
    /// Schema version for forward-compatible config upgrades.
    pub version: u32,
    /// Catalog file locations.
    pub catalog: CatalogConfig,
    /// Merged-catalog cache settings.
    pub cache: CacheConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            catalog: CatalogConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Catalog file locations. Unset paths resolve to platform defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CatalogConfig {
    /// Distributor catalog (required at run time).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_path: Option<PathBuf>,
    /// User overlay catalog (optional at run time).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_path: Option<PathBuf>,
}

/// Merged-catalog cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CacheConfig {
    /// Reuse the merged catalog between calls.
    pub enabled: bool,
    /// Entry lifetime in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Minimum level for structured log events.
    pub level: LogLevelSetting,
}

/// Minimum level accepted by the structured logger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevelSetting {
    /// Everything.
    Debug,
    /// Informational and above.
    Info,
    /// Warnings and errors (default).
    #[default]
    Warn,
    /// Errors only.
    Error,
}

impl LogLevelSetting {
    /// Parse a case-insensitive level name.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl SynthConfig {
    /// Validate the config and return a wrapper with bounded values.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedSynthConfig, ConfigSchemaError> {
        self.validate_version()?;
        self.catalog.normalize();
        self.catalog.validate()?;
        self.cache.validate()?;
        let cache_ttl = Duration::from_secs(self.cache.ttl_secs);
        Ok(ValidatedSynthConfig {
            raw: self,
            cache_ttl,
        })
    }

    const fn validate_version(&self) -> Result<(), ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        Ok(())
    }
}

impl CatalogConfig {
    fn normalize(&mut self) {
        self.baseline_path = self.baseline_path.take().filter(|path| !is_blank(path));
        self.user_path = self.user_path.take().filter(|path| !is_blank(path));
    }

    fn validate(&self) -> Result<(), ConfigSchemaError> {
        match (&self.baseline_path, &self.user_path) {
            (Some(baseline), Some(user)) if baseline == user => {
                Err(ConfigSchemaError::SameCatalogPaths {
                    path: baseline.clone(),
                })
            },
            _ => Ok(()),
        }
    }
}

impl CacheConfig {
    const fn validate(&self) -> Result<(), ConfigSchemaError> {
        if self.ttl_secs < CACHE_TTL_MIN_SECS || self.ttl_secs > CACHE_TTL_MAX_SECS {
            return Err(ConfigSchemaError::CacheTtlOutOfRange {
                value: self.ttl_secs,
                min: CACHE_TTL_MIN_SECS,
                max: CACHE_TTL_MAX_SECS,
            });
        }
        Ok(())
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

/// Validated config wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSynthConfig {
    raw: SynthConfig,
    cache_ttl: Duration,
}

impl ValidatedSynthConfig {
    /// Cache entry lifetime.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// Whether the merged-catalog cache is enabled.
    #[must_use]
    pub const fn cache_enabled(&self) -> bool {
        self.raw.cache.enabled
    }

    /// Minimum structured log level.
    #[must_use]
    pub const fn log_level(&self) -> LogLevelSetting {
        self.raw.logging.level
    }

    /// Borrow the raw config.
    #[must_use]
    pub const fn as_ref(&self) -> &SynthConfig {
        &self.raw
    }

    /// Consume the wrapper and return the raw config.
    #[must_use]
    pub fn into_inner(self) -> SynthConfig {
        self.raw
    }
}

impl AsRef<SynthConfig> for ValidatedSynthConfig {
    fn as_ref(&self) -> &SynthConfig {
        &self.raw
    }
}

/// Schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The config version is not supported by this binary.
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// Cache lifetime is out of bounds.
    CacheTtlOutOfRange {
        /// Value provided (seconds).
        value: u64,
        /// Minimum allowed value.
        min: u64,
        /// Maximum allowed value.
        max: u64,
    },
    /// Baseline and user catalog point at the same file.
    SameCatalogPaths {
        /// Shared path.
        path: PathBuf,
    },
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => write!(
                formatter,
                "unsupported config version: {found} (supported: {supported})"
            ),
            Self::CacheTtlOutOfRange { value, min, max } => write!(
                formatter,
                "cache.ttlSecs must be between {min} and {max} (got {value})"
            ),
            Self::SameCatalogPaths { path } => write!(
                formatter,
                "catalog.baselinePath and catalog.userPath must differ ({})",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let envelope = Self::expected(ErrorCode::new("config", "invalid_value"), error.to_string());
        match error {
            ConfigSchemaError::UnsupportedVersion { found, .. } => {
                envelope.with_metadata("field", "version").with_metadata("value", found.to_string())
            },
            ConfigSchemaError::CacheTtlOutOfRange { value, .. } => envelope
                .with_metadata("field", "cache.ttlSecs")
                .with_metadata("value", value.to_string()),
            ConfigSchemaError::SameCatalogPaths { path } => envelope
                .with_metadata("field", "catalog.userPath")
                .with_metadata("value", path.display().to_string()),
        }
    }
}

/// Parse a config from JSON and validate it.
pub fn parse_synth_config_json(input: &str) -> Result<ValidatedSynthConfig, ErrorEnvelope> {
    let config: SynthConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;
    config.validate_and_normalize().map_err(ErrorEnvelope::from)
}

/// Parse a config from TOML and validate it.
pub fn parse_synth_config_toml(input: &str) -> Result<ValidatedSynthConfig, ErrorEnvelope> {
    let config: SynthConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;
    config.validate_and_normalize().map_err(ErrorEnvelope::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() -> Result<(), ConfigSchemaError> {
        let validated = SynthConfig::default().validate_and_normalize()?;
        assert_eq!(validated.cache_ttl(), Duration::from_secs(300));
        assert!(validated.cache_enabled());
        assert_eq!(validated.log_level(), LogLevelSetting::Warn);
        Ok(())
    }

    #[test]
    fn rejects_unknown_version() {
        let config = SynthConfig {
            version: 7,
            ..SynthConfig::default()
        };
        assert_eq!(
            config.validate_and_normalize(),
            Err(ConfigSchemaError::UnsupportedVersion {
                found: 7,
                supported: CURRENT_CONFIG_VERSION,
            })
        );
    }

    #[test]
    fn rejects_out_of_range_ttl() {
        for ttl_secs in [0, CACHE_TTL_MAX_SECS + 1] {
            let mut config = SynthConfig::default();
            config.cache.ttl_secs = ttl_secs;
            let error = config.validate_and_normalize().err();
            assert!(matches!(
                error,
                Some(ConfigSchemaError::CacheTtlOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn blank_paths_normalize_to_defaults() -> Result<(), ConfigSchemaError> {
        let mut config = SynthConfig::default();
        config.catalog.baseline_path = Some(PathBuf::from("  "));
        let validated = config.validate_and_normalize()?;
        assert_eq!(validated.as_ref().catalog.baseline_path, None);
        Ok(())
    }

    #[test]
    fn rejects_identical_catalog_paths() {
        let mut config = SynthConfig::default();
        config.catalog.baseline_path = Some(PathBuf::from("rules.toml"));
        config.catalog.user_path = Some(PathBuf::from("rules.toml"));
        let envelope = config
            .validate_and_normalize()
            .map_err(ErrorEnvelope::from)
            .err();
        assert_eq!(
            envelope.map(|error| error.code),
            Some(ErrorCode::new("config", "invalid_value"))
        );
    }

    #[test]
    fn parses_camel_case_toml() -> Result<(), ErrorEnvelope> {
        let validated = parse_synth_config_toml(
            "version = 1\n[catalog]\nuserPath = \"mine.toml\"\n[cache]\nttlSecs = 60\n[logging]\nlevel = \"debug\"\n",
        )?;
        let config = validated.as_ref();
        assert_eq!(config.catalog.user_path, Some(PathBuf::from("mine.toml")));
        assert_eq!(config.cache.ttl_secs, 60);
        assert!(config.cache.enabled);
        assert_eq!(config.logging.level, LogLevelSetting::Debug);
        Ok(())
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = parse_synth_config_json(r#"{"cache":{"ttl":5}}"#).err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("config", "invalid_json"))
        );
    }

    #[test]
    fn level_parsing_is_case_insensitive() {
        assert_eq!(LogLevelSetting::parse("INFO"), Some(LogLevelSetting::Info));
        assert_eq!(LogLevelSetting::parse("warning"), Some(LogLevelSetting::Warn));
        assert_eq!(LogLevelSetting::parse("loud"), None);
    }
}
