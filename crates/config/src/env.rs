//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict: a variable that is present but empty or
//! unparseable fails fast instead of being ignored.

use crate::schema::{LogLevelSetting, SynthConfig, ValidatedSynthConfig};
use rulesynth_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Env var: baseline catalog path.
pub const ENV_BASELINE_CATALOG: &str = "RULESYNTH_BASELINE_CATALOG";
/// Env var: user catalog path.
pub const ENV_USER_CATALOG: &str = "RULESYNTH_USER_CATALOG";
/// Env var: merged-catalog cache toggle.
pub const ENV_CACHE_ENABLED: &str = "RULESYNTH_CACHE_ENABLED";
/// Env var: merged-catalog cache lifetime in seconds.
pub const ENV_CACHE_TTL_SECS: &str = "RULESYNTH_CACHE_TTL_SECS";
/// Env var: minimum structured log level.
pub const ENV_LOG_LEVEL: &str = "RULESYNTH_LOG_LEVEL";
/// Env var: project root used when no explicit root is given.
pub const ENV_PROJECT_PATH: &str = "PROJECT_PATH";

const KNOWN_VARS: [&str; 6] = [
    ENV_BASELINE_CATALOG,
    ENV_USER_CATALOG,
    ENV_CACHE_ENABLED,
    ENV_CACHE_TTL_SECS,
    ENV_LOG_LEVEL,
    ENV_PROJECT_PATH,
];

/// Parsed env overrides. `None` means the variable was not set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthEnv {
    /// Baseline catalog override.
    pub baseline_catalog: Option<PathBuf>,
    /// User catalog override.
    pub user_catalog: Option<PathBuf>,
    /// Cache toggle override.
    pub cache_enabled: Option<bool>,
    /// Cache lifetime override (seconds).
    pub cache_ttl_secs: Option<u64>,
    /// Log level override.
    pub log_level: Option<LogLevelSetting>,
    /// Project root fallback.
    pub project_path: Option<PathBuf>,
}

impl SynthEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            baseline_catalog: parse_optional_path(map, ENV_BASELINE_CATALOG)?,
            user_catalog: parse_optional_path(map, ENV_USER_CATALOG)?,
            cache_enabled: parse_optional_bool(map, ENV_CACHE_ENABLED)?,
            cache_ttl_secs: parse_optional_u64(map, ENV_CACHE_TTL_SECS)?,
            log_level: parse_optional_level(map, ENV_LOG_LEVEL)?,
            project_path: parse_optional_path(map, ENV_PROJECT_PATH)?,
        })
    }

    /// Parse env overrides from the current process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in KNOWN_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_owned(), value);
            }
        }
        Self::from_map(&map)
    }
}

/// Apply env overrides on top of a base config, then validate.
pub fn apply_env_overrides(
    base: SynthConfig,
    env: &SynthEnv,
) -> Result<ValidatedSynthConfig, ErrorEnvelope> {
    let mut config = base;
    if let Some(path) = &env.baseline_catalog {
        config.catalog.baseline_path = Some(path.clone());
    }
    if let Some(path) = &env.user_catalog {
        config.catalog.user_path = Some(path.clone());
    }
    if let Some(enabled) = env.cache_enabled {
        config.cache.enabled = enabled;
    }
    if let Some(ttl_secs) = env.cache_ttl_secs {
        config.cache.ttl_secs = ttl_secs;
    }
    if let Some(level) = env.log_level {
        config.logging.level = level;
    }

    config.validate_and_normalize().map_err(Into::into)
}

/// Env parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Integer env var had an invalid value.
    InvalidInt {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidInt { var, .. } => write!(formatter, "{var} must be an integer"),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let envelope = Self::expected(ErrorCode::new("config", "invalid_env"), error.to_string());
        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidBool { var, value }
            | EnvParseError::InvalidInt { var, value }
            | EnvParseError::InvalidEnum { var, value } => envelope
                .with_metadata("env_var", var)
                .with_metadata("value", value),
        }
    }
}

fn read_trimmed<'a>(
    map: &'a BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<&'a str>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }
    Ok(Some(trimmed))
}

fn parse_optional_path(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<PathBuf>, EnvParseError> {
    Ok(read_trimmed(map, var)?.map(PathBuf::from))
}

fn parse_optional_u64(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u64>, EnvParseError> {
    let Some(trimmed) = read_trimmed(map, var)? else {
        return Ok(None);
    };
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: trimmed.to_owned(),
        })
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(trimmed) = read_trimmed(map, var)? else {
        return Ok(None);
    };
    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: trimmed.to_owned(),
        }),
    }
}

fn parse_optional_level(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<LogLevelSetting>, EnvParseError> {
    let Some(trimmed) = read_trimmed(map, var)? else {
        return Ok(None);
    };
    LogLevelSetting::parse(trimmed)
        .map(Some)
        .ok_or_else(|| EnvParseError::InvalidEnum {
            var,
            value: trimmed.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn empty_map_has_no_overrides() -> Result<(), EnvParseError> {
        assert_eq!(SynthEnv::from_map(&BTreeMap::new())?, SynthEnv::default());
        Ok(())
    }

    #[test]
    fn parses_all_known_vars() -> Result<(), EnvParseError> {
        let env = SynthEnv::from_map(&env_map(&[
            (ENV_BASELINE_CATALOG, " /opt/rules.toml "),
            (ENV_CACHE_ENABLED, "off"),
            (ENV_CACHE_TTL_SECS, "30"),
            (ENV_LOG_LEVEL, "Debug"),
            (ENV_PROJECT_PATH, "/work/app"),
        ]))?;
        assert_eq!(env.baseline_catalog, Some(PathBuf::from("/opt/rules.toml")));
        assert_eq!(env.cache_enabled, Some(false));
        assert_eq!(env.cache_ttl_secs, Some(30));
        assert_eq!(env.log_level, Some(LogLevelSetting::Debug));
        assert_eq!(env.project_path, Some(PathBuf::from("/work/app")));
        assert_eq!(env.user_catalog, None);
        Ok(())
    }

    #[test]
    fn invalid_values_fail_fast() {
        let cases = [
            (ENV_CACHE_ENABLED, "maybe"),
            (ENV_CACHE_TTL_SECS, "-1"),
            (ENV_LOG_LEVEL, "verbose"),
            (ENV_USER_CATALOG, "   "),
        ];
        for (var, value) in cases {
            let result = SynthEnv::from_map(&env_map(&[(var, value)]));
            let envelope = result.map_err(ErrorEnvelope::from).err();
            assert_eq!(
                envelope.as_ref().map(|error| error.code.clone()),
                Some(ErrorCode::new("config", "invalid_env")),
                "{var}={value}"
            );
            assert_eq!(
                envelope
                    .as_ref()
                    .and_then(|error| error.metadata.get("env_var"))
                    .map(String::as_str),
                Some(var)
            );
        }
    }

    #[test]
    fn env_overrides_win_and_are_validated() -> Result<(), ErrorEnvelope> {
        let env = SynthEnv {
            cache_ttl_secs: Some(45),
            log_level: Some(LogLevelSetting::Error),
            ..SynthEnv::default()
        };
        let validated = apply_env_overrides(SynthConfig::default(), &env)?;
        assert_eq!(validated.as_ref().cache.ttl_secs, 45);
        assert_eq!(validated.log_level(), LogLevelSetting::Error);

        let out_of_range = SynthEnv {
            cache_ttl_secs: Some(0),
            ..SynthEnv::default()
        };
        let error = apply_env_overrides(SynthConfig::default(), &out_of_range).err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("config", "invalid_value"))
        );
        Ok(())
    }
}
