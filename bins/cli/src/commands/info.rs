//! Info command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_json_line};
use rulesynth_app::app_crate_version;
use rulesynth_config::CATALOG_FILE_NAME;

/// Run the info command.
pub fn run_info(mode: OutputMode) -> Result<CliOutput, CliError> {
    let name = env!("CARGO_BIN_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "ok",
            "build": {
                "name": name,
                "version": version,
                "appVersion": app_crate_version(),
                "catalogFileName": CATALOG_FILE_NAME,
            }
        });
        to_json_line(&payload)?
    } else {
        format!(
            "status: ok\nname: {name}\nversion: {version}\napp: {}\ncatalog file: {CATALOG_FILE_NAME}\n",
            app_crate_version()
        )
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
