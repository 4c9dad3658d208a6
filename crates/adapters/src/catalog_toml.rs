//! TOML catalog codec and file store.
//!
//! A catalog file maps each category name to a table with a `patterns`
//! array:
//!
//! ```toml
//! [Python]
//! patterns = ["*.py[cod]", "__pycache__/", "venv/ # local envs"]
//! ```
//!
//! Malformed entries are skipped one at a time so a single bad category
//! never hides the rest of the file.

use rulesynth_domain::{Catalog, Category, CategoryName, Pattern};
use rulesynth_ports::{CatalogStorePort, ParsedCatalog};
use rulesynth_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result};
use std::io;
use std::path::Path;
use toml::{Table, Value};

const PATTERNS_KEY: &str = "patterns";
const RULE_LINE: &str =
    "################################################################################";
const HEADER: &str = "# Merged ignore-rule catalog (baseline + user overlay)\n# Generated by rulesynth; edit the user catalog instead of this file.\n";
const DEFAULT_DESCRIPTION: &str = "user-defined category";

/// Human description for a well-known category.
#[must_use]
pub fn category_description(name: &str) -> &'static str {
    match name {
        "OperatingSystem" => "operating system clutter (macOS, Windows, Linux)",
        "IDE" => "files generated by editors and IDEs",
        "BuildArtifacts" => "build output, binaries, compilation caches",
        "Python" => "Python environments, bytecode, packaging output",
        "Java" => "JVM, Gradle, Maven",
        "NodeJS" => "Node and frontend build output",
        "Go" => "Go binaries and modules",
        "Rust" => "Rust Cargo",
        "DotNet" => ".NET / C#",
        "Android_iOS" => "mobile platforms: Android, Xcode, Swift",
        "Containers_CI" => "Docker, Kubernetes, Terraform, CI/CD artifacts",
        "Logs_Tmp" => "logs, caches, temporary files",
        "LaTeX_Metadata" => "LaTeX / Pandoc artifacts",
        "Documentation" => "generated docs (Sphinx, MkDocs, Hugo, ...)",
        "CustomDiagnostics" => "custom diagnostic patterns",
        _ => DEFAULT_DESCRIPTION,
    }
}

/// Parse catalog text. `source` names the file in warnings and errors.
pub fn parse_catalog(input: &str, source: &str) -> Result<ParsedCatalog> {
    let table: Table = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::catalog_parse(),
            format!("invalid catalog TOML: {error}"),
        )
        .with_metadata("path", source)
    })?;

    let mut categories = Vec::with_capacity(table.len());
    let mut skipped = Vec::new();
    for (name, value) in table {
        match parse_category(&name, value) {
            Ok(category) => categories.push(category),
            Err(reason) => skipped.push(
                ErrorEnvelope::expected(
                    ErrorCode::category_skipped(),
                    format!("skipped category `{name}`: {reason}"),
                )
                .with_metadata("category", name)
                .with_metadata("path", source),
            ),
        }
    }

    let catalog = Catalog::new(categories)
        .map_err(|error| ErrorEnvelope::from(error).with_metadata("path", source))?;
    Ok(ParsedCatalog { catalog, skipped })
}

fn parse_category(name: &str, value: Value) -> std::result::Result<Category, &'static str> {
    let name = CategoryName::new(name).map_err(|_| "category name is blank")?;
    let Value::Table(mut table) = value else {
        return Err("entry is not a table");
    };
    let Some(patterns) = table.remove(PATTERNS_KEY) else {
        return Err("missing `patterns` list");
    };
    let Value::Array(items) = patterns else {
        return Err("`patterns` is not a list");
    };
    let patterns = items
        .into_iter()
        .map(|item| match item {
            Value::String(text) => Ok(Pattern::new(text)),
            _ => Err("`patterns` contains a non-string element"),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Category::new(name, patterns))
}

/// Render a catalog with a header and one commented block per category.
pub fn render_catalog(catalog: &Catalog) -> Result<String> {
    let mut output = String::from(HEADER);
    for category in catalog {
        let patterns = category
            .patterns
            .iter()
            .map(|pattern| Value::String(pattern.as_str().to_owned()))
            .collect();
        let mut body = Table::new();
        body.insert(PATTERNS_KEY.to_owned(), Value::Array(patterns));
        let mut entry = Table::new();
        entry.insert(category.name.as_str().to_owned(), Value::Table(body));

        let block = toml::to_string_pretty(&entry).map_err(|error| {
            ErrorEnvelope::unexpected(
                ErrorCode::internal(),
                format!("failed to render catalog TOML: {error}"),
                ErrorClass::NonRetriable,
            )
            .with_metadata("category", category.name.as_str())
        })?;

        output.push('\n');
        output.push_str(RULE_LINE);
        output.push('\n');
        output.push_str(&format!(
            "# [{}] - {}\n",
            category.name,
            category_description(category.name.as_str())
        ));
        output.push_str(&block);
    }
    Ok(output)
}

/// Catalog store reading and rendering TOML files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCatalogStore;

impl TomlCatalogStore {
    /// Build a store.
    pub const fn new() -> Self {
        Self
    }
}

impl CatalogStorePort for TomlCatalogStore {
    fn load(&self, path: &Path) -> Result<Option<ParsedCatalog>> {
        let source = path.display().to_string();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) if error.kind() == io::ErrorKind::InvalidData => {
                return Err(ErrorEnvelope::expected(
                    ErrorCode::catalog_parse(),
                    "catalog file is not valid UTF-8",
                )
                .with_metadata("path", source));
            },
            Err(error) => return Err(ErrorEnvelope::from(error).with_metadata("path", source)),
        };
        parse_catalog(&text, &source).map(Some)
    }

    fn render(&self, catalog: &Catalog) -> Result<String> {
        render_catalog(catalog)
    }
}
