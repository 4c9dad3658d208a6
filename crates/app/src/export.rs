//! Persist a merged catalog to disk.

use rulesynth_domain::Catalog;
use rulesynth_ports::{CatalogStorePort, FileWriterPort, LoggerPort, WriteOutcome, log_fields};
use rulesynth_shared::{ErrorCode, ErrorEnvelope, Result, ResultExt};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Input payload for catalog export.
#[derive(Debug, Clone)]
pub struct ExportCatalogInput {
    /// Catalog to write.
    pub catalog: Catalog,
    /// Destination file.
    pub output_path: PathBuf,
}

/// Dependencies required by catalog export.
#[derive(Clone)]
pub struct ExportCatalogDeps {
    /// Renders the catalog text.
    pub catalogs: Arc<dyn CatalogStorePort>,
    /// Backup-aware writer.
    pub writer: Arc<dyn FileWriterPort>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Render `input.catalog` and write it, backing up differing previous content.
#[tracing::instrument(
    name = "rulesynth.export_catalog",
    skip_all,
    fields(out = %input.output_path.display())
)]
pub fn export_catalog(deps: &ExportCatalogDeps, input: &ExportCatalogInput) -> Result<WriteOutcome> {
    let display = input.output_path.display().to_string();
    if input.catalog.is_empty() {
        return Err(ErrorEnvelope::expected(
            ErrorCode::new("catalog", "empty"),
            "refusing to export an empty catalog",
        )
        .with_metadata("path", display));
    }

    let text = deps.catalogs.render(&input.catalog)?;
    let outcome = deps
        .writer
        .write_with_backup(&input.output_path, &text)
        .with_metadata("operation", "export_catalog")?;

    if let Some(logger) = deps.logger.as_ref() {
        let (status, backup) = match &outcome {
            WriteOutcome::Created => ("created", Value::Null),
            WriteOutcome::Updated { backup_path } => (
                "updated",
                Value::String(backup_path.display().to_string()),
            ),
            WriteOutcome::Unchanged => ("unchanged", Value::Null),
        };
        logger.info(
            "catalog.export.completed",
            "Catalog exported",
            Some(log_fields([
                ("path", Value::String(display)),
                ("status", Value::from(status)),
                ("backupPath", backup),
                ("categories", input.catalog.len().into()),
                ("patterns", input.catalog.total_patterns().into()),
            ])),
        );
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulesynth_domain::{Category, CategoryName, Pattern};
    use rulesynth_ports::ParsedCatalog;
    use std::path::Path;
    use std::sync::Mutex;

    struct LineStore;

    impl CatalogStorePort for LineStore {
        fn load(&self, _path: &Path) -> Result<Option<ParsedCatalog>> {
            Ok(None)
        }

        fn render(&self, catalog: &Catalog) -> Result<String> {
            Ok(catalog
                .iter()
                .map(|category| category.name.as_str().to_owned())
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }

    #[derive(Default)]
    struct RecordingWriter {
        writes: Mutex<Vec<(PathBuf, String)>>,
    }

    impl FileWriterPort for RecordingWriter {
        fn write_with_backup(&self, path: &Path, content: &str) -> Result<WriteOutcome> {
            if let Ok(mut writes) = self.writes.lock() {
                writes.push((path.to_path_buf(), content.to_owned()));
            }
            Ok(WriteOutcome::Created)
        }
    }

    fn deps(writer: Arc<RecordingWriter>) -> ExportCatalogDeps {
        ExportCatalogDeps {
            catalogs: Arc::new(LineStore),
            writer,
            logger: None,
        }
    }

    #[test]
    fn empty_catalog_is_refused_without_writing() {
        let writer = Arc::new(RecordingWriter::default());
        let input = ExportCatalogInput {
            catalog: Catalog::empty(),
            output_path: PathBuf::from("/tmp/out.toml"),
        };

        let error = export_catalog(&deps(Arc::clone(&writer)), &input).err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("catalog", "empty"))
        );
        assert!(writer.writes.lock().map(|w| w.is_empty()).unwrap_or(false));
    }

    #[test]
    fn rendered_text_reaches_the_writer() -> Result<()> {
        let writer = Arc::new(RecordingWriter::default());
        let name = CategoryName::new("Go")?;
        let catalog = Catalog::new(vec![Category::new(name, vec![Pattern::new("*.test")])])?;
        let input = ExportCatalogInput {
            catalog,
            output_path: PathBuf::from("/tmp/out.toml"),
        };

        let outcome = export_catalog(&deps(Arc::clone(&writer)), &input)?;
        assert_eq!(outcome, WriteOutcome::Created);
        let writes = writer.writes.lock().map(|w| w.clone()).unwrap_or_default();
        assert_eq!(
            writes,
            vec![(PathBuf::from("/tmp/out.toml"), "Go".to_owned())]
        );
        Ok(())
    }
}
