//! Synthesize command handler.

use crate::error::{CliError, ExitCode};
use crate::format::{
    OutputMode, SynthesizeReport, format_match_text, format_warnings_text, to_json_line,
};
use crate::wiring::Runtime;
use crate::{CliOutput, format_error_output};
use rulesynth_app::{SynthesizeInput, synthesize};
use rulesynth_config::resolve_project_root;
use std::path::Path;

/// Flags accepted by `rulesynth synthesize`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SynthesizeArgs<'a> {
    pub root: Option<&'a Path>,
    pub baseline: Option<&'a Path>,
    pub user: Option<&'a Path>,
}

/// Run the synthesize command.
pub fn run_synthesize(
    mode: OutputMode,
    config_path: Option<&Path>,
    args: SynthesizeArgs<'_>,
) -> Result<CliOutput, CliError> {
    let runtime = match Runtime::load(config_path) {
        Ok(runtime) => runtime,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    let project_root = match resolve_project_root(args.root, &runtime.env) {
        Ok(root) => root,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let input = SynthesizeInput {
        sources: runtime.catalog_sources(args.baseline, args.user),
        project_root,
    };
    let (result, warnings) = match synthesize(&runtime.synthesize_deps(), &input).into_result() {
        Ok(parts) => parts,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let stdout = if mode.is_json() {
        let report = SynthesizeReport::new(
            input.project_root.display().to_string(),
            &result,
            &warnings,
        );
        to_json_line(&report)?
    } else {
        format_match_text(&result)
    };
    let stderr = if mode.is_json() {
        String::new()
    } else {
        format_warnings_text(&warnings)
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}
