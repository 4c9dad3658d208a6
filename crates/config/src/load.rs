//! Config loading helpers (env + file).
//!
//! The loader is responsible for deterministic merge order and surfacing
//! user-facing errors as typed `ErrorEnvelope`s.

use crate::{SynthConfig, SynthEnv, ValidatedSynthConfig, apply_env_overrides};
use rulesynth_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

/// Load the config from an optional file path.
///
/// Precedence (highest wins):
/// - env overrides (`SynthEnv`)
/// - config file (TOML or JSON, chosen by extension)
/// - defaults (`SynthConfig::default()`)
pub fn load_synth_config_from_path(
    config_path: Option<&Path>,
    env: &SynthEnv,
) -> Result<ValidatedSynthConfig, ErrorEnvelope> {
    let config = match config_path {
        None => SynthConfig::default(),
        Some(path) => {
            let config_text = read_config_file(path)?;
            let format = detect_config_format(path)?;
            parse_config_unvalidated(&config_text, format)?
        },
    };

    // env is applied last and also validates/normalizes the resulting config.
    apply_env_overrides(config, env)
}

/// Load the config from std env and an optional file path.
pub fn load_synth_config_std_env(
    config_path: Option<&Path>,
) -> Result<ValidatedSynthConfig, ErrorEnvelope> {
    let env = SynthEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_synth_config_from_path(config_path, &env)
}

/// Serialize the config as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(config: &SynthConfig) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize config: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize the config as deterministic pretty TOML.
pub fn to_pretty_toml(config: &SynthConfig) -> Result<String, ErrorEnvelope> {
    toml::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize config TOML: {error}"),
            ErrorClass::NonRetriable,
        )
    })
}

fn parse_config_unvalidated(
    input: &str,
    format: ConfigFormat,
) -> Result<SynthConfig, ErrorEnvelope> {
    match format {
        ConfigFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid config JSON: {error}"),
            )
            .with_metadata("source", "config")
        }),
        ConfigFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid config TOML: {error}"),
            )
            .with_metadata("source", "config")
        }),
    }
}

fn read_config_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "config_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "config_file_permission_denied")
            },
            _ => ErrorCode::new("config", "config_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read config file: {error}"))
            .with_metadata("path", path.display().to_string())
    })
}

fn detect_config_format(path: &Path) -> Result<ConfigFormat, ErrorEnvelope> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => Ok(ConfigFormat::Json),
        None | Some("toml") => Ok(ConfigFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported config format; use .toml or .json",
        )
        .with_metadata("extension", other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_detection_by_extension() {
        assert_eq!(
            detect_config_format(Path::new("a/rulesynth.JSON")).ok(),
            Some(ConfigFormat::Json)
        );
        assert_eq!(
            detect_config_format(Path::new("rulesynth.toml")).ok(),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            detect_config_format(Path::new("rulesynthrc")).ok(),
            Some(ConfigFormat::Toml)
        );
        let error = detect_config_format(Path::new("rulesynth.yaml")).err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("config", "unsupported_format"))
        );
    }

    #[test]
    fn missing_file_has_config_code() {
        let error = read_config_file(Path::new("/definitely/not/here.toml")).err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("config", "config_file_not_found"))
        );
    }

    #[test]
    fn defaults_render_as_toml_and_json() -> Result<(), ErrorEnvelope> {
        let config = SynthConfig::default();
        let toml_text = to_pretty_toml(&config)?;
        assert!(toml_text.contains("ttlSecs = 300"));
        assert!(toml_text.contains("level = \"warn\""));
        let json_text = to_pretty_json(&config)?;
        assert!(json_text.ends_with('\n'));
        assert!(json_text.contains("\"ttlSecs\": 300"));
        Ok(())
    }
}
