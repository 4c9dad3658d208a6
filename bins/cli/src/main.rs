//! CLI binary entrypoint.

mod commands;
mod error;
mod format;
mod wiring;

use clap::{Parser, Subcommand};
use commands::{
    SynthesizeArgs, run_catalog_export, run_catalog_show, run_config_show, run_info,
    run_synthesize,
};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode, format_error_text, to_json_line};
use rulesynth_shared::ErrorEnvelope;
use std::io::{self, Write};
use std::path::PathBuf;

const BASELINE_HELP: &str = "\
Baseline catalog:
  Copy assets/gitignore_catalog.toml next to the rulesynth binary
  (for example target/debug/ after `cargo build`), or point
  RULESYNTH_BASELINE_CATALOG, the config file or --baseline at it.";

#[derive(Debug, Parser)]
#[command(
    name = "rulesynth",
    version,
    about = "Synthesize ignore rules for a project from a catalog of known patterns",
    long_about = None,
    after_help = BASELINE_HELP
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    /// Optional config file path (TOML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show build and version details.
    Info,
    /// Select the catalog rules that match files in a project.
    Synthesize {
        /// Project root (defaults to `PROJECT_PATH`, then the current directory).
        #[arg(long)]
        root: Option<PathBuf>,
        #[command(flatten)]
        catalogs: CatalogArgs,
    },
    /// Catalog-related commands.
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum CatalogCommands {
    /// Print the merged catalog.
    Show {
        #[command(flatten)]
        catalogs: CatalogArgs,
    },
    /// Write the merged catalog to a file, backing up differing content.
    Export {
        /// Destination file.
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        catalogs: CatalogArgs,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Print the effective config.
    Show,
}

#[derive(Debug, clap::Args)]
struct CatalogArgs {
    /// Baseline catalog override.
    #[arg(long)]
    baseline: Option<PathBuf>,
    /// User catalog override.
    #[arg(long)]
    user: Option<PathBuf>,
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    wiring::init_tracing();
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);

    match run(&cli, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(cli: &Cli, mode: OutputMode) -> Result<CliOutput, CliError> {
    let config_path = cli.config.as_deref();
    tracing::debug!(command = ?cli.command, "dispatching command");
    match &cli.command {
        Commands::Info => run_info(mode),
        Commands::Synthesize { root, catalogs } => run_synthesize(
            mode,
            config_path,
            SynthesizeArgs {
                root: root.as_deref(),
                baseline: catalogs.baseline.as_deref(),
                user: catalogs.user.as_deref(),
            },
        ),
        Commands::Catalog { command } => match command {
            CatalogCommands::Show { catalogs } => run_catalog_show(
                mode,
                config_path,
                catalogs.baseline.as_deref(),
                catalogs.user.as_deref(),
            ),
            CatalogCommands::Export { out, catalogs } => run_catalog_export(
                mode,
                config_path,
                out,
                catalogs.baseline.as_deref(),
                catalogs.user.as_deref(),
            ),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => run_config_show(mode, config_path),
        },
    }
}

pub(crate) fn format_error_output(mode: OutputMode, error: &ErrorEnvelope) -> CliOutput {
    let exit_code = ExitCode::for_envelope(error);
    if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": error,
        });
        // This is a CLI boundary, so JSON serialization errors are internal.
        let stdout = to_json_line(&payload).unwrap_or_else(|_| {
            "{\"status\":\"error\",\"error\":{\"code\":\"core:internal\",\"message\":\"internal error\"}}\n".to_owned()
        });
        return CliOutput {
            stdout,
            stderr: String::new(),
            exit_code,
        };
    }

    CliOutput {
        stdout: String::new(),
        stderr: format_error_text(error),
        exit_code,
    }
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}
