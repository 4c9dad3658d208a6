//! Catalog command handlers.

use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, format_warnings_text, to_json_line};
use crate::wiring::Runtime;
use crate::{CliOutput, format_error_output};
use rulesynth_app::{ExportCatalogInput, export_catalog, merge_catalog_files};
use rulesynth_domain::Catalog;
use rulesynth_ports::{CatalogStorePort, WriteOutcome};
use rulesynth_shared::ErrorEnvelope;
use std::path::Path;

/// Run `catalog show`: print the merged catalog.
pub fn run_catalog_show(
    mode: OutputMode,
    config_path: Option<&Path>,
    baseline: Option<&Path>,
    user: Option<&Path>,
) -> Result<CliOutput, CliError> {
    let (runtime, catalog, warnings) = match load_merged(config_path, baseline, user) {
        Ok(parts) => parts,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let (stdout, stderr) = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "ok",
            "categories": catalog,
            "categoriesCount": catalog.len(),
            "totalPatterns": catalog.total_patterns(),
            "warnings": warnings,
        });
        (to_json_line(&payload)?, String::new())
    } else {
        match runtime.catalog_store().render(&catalog) {
            Ok(text) => (text, format_warnings_text(&warnings)),
            Err(error) => return Ok(format_error_output(mode, &error)),
        }
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// Run `catalog export`: write the merged catalog with backup-on-write.
pub fn run_catalog_export(
    mode: OutputMode,
    config_path: Option<&Path>,
    out: &Path,
    baseline: Option<&Path>,
    user: Option<&Path>,
) -> Result<CliOutput, CliError> {
    if out.is_dir() {
        return Err(CliError::InvalidInput(format!(
            "--out must name a file, not a directory: {}",
            out.display()
        )));
    }
    let (runtime, catalog, warnings) = match load_merged(config_path, baseline, user) {
        Ok(parts) => parts,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let input = ExportCatalogInput {
        catalog,
        output_path: out.to_path_buf(),
    };
    let outcome = match export_catalog(&runtime.export_deps(), &input) {
        Ok(outcome) => outcome,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let (status, backup_path) = match &outcome {
        WriteOutcome::Created => ("created", None),
        WriteOutcome::Updated { backup_path } => ("updated", Some(backup_path.display().to_string())),
        WriteOutcome::Unchanged => ("unchanged", None),
    };

    let (stdout, stderr) = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "ok",
            "write": status,
            "path": out.display().to_string(),
            "backupPath": backup_path,
            "warnings": warnings,
        });
        (to_json_line(&payload)?, String::new())
    } else {
        let mut text = format!("status: ok\nwrite: {status}\npath: {}\n", out.display());
        if let Some(backup) = backup_path {
            text.push_str("backup: ");
            text.push_str(&backup);
            text.push('\n');
        }
        (text, format_warnings_text(&warnings))
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

fn load_merged(
    config_path: Option<&Path>,
    baseline: Option<&Path>,
    user: Option<&Path>,
) -> Result<(Runtime, Catalog, Vec<ErrorEnvelope>), ErrorEnvelope> {
    let runtime = Runtime::load(config_path)?;
    let sources = runtime.catalog_sources(baseline, user);
    let (catalog, warnings) = merge_catalog_files(&runtime.merge_deps(), &sources).into_result()?;
    Ok((runtime, catalog, warnings))
}
