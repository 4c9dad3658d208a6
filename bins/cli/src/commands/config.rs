//! Config command handlers.

use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_json_line};
use crate::{CliOutput, format_error_output};
use rulesynth_config::{CatalogPaths, SynthEnv, load_synth_config_from_path, to_pretty_toml};
use rulesynth_shared::ErrorEnvelope;
use std::path::Path;

/// Run `config show`: print the effective config after env overrides.
pub fn run_config_show(mode: OutputMode, config_path: Option<&Path>) -> Result<CliOutput, CliError> {
    let loaded = SynthEnv::from_std_env()
        .map_err(ErrorEnvelope::from)
        .and_then(|env| load_synth_config_from_path(config_path, &env));
    let config = match loaded {
        Ok(config) => config,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    let paths = CatalogPaths::resolve(config.as_ref());

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "ok",
            "configPath": config_path.map(|path| path.display().to_string()),
            "effectiveConfig": config.as_ref(),
            "resolvedCatalogs": {
                "baseline": paths.baseline.display().to_string(),
                "user": paths.user.as_ref().map(|path| path.display().to_string()),
            },
        });
        to_json_line(&payload)?
    } else {
        match to_pretty_toml(config.as_ref()) {
            Ok(text) => text,
            Err(error) => return Ok(format_error_output(mode, &error)),
        }
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
