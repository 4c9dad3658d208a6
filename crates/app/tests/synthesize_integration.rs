//! End-to-end synthesis over real adapters and a temporary project tree.

use pretty_assertions::assert_eq;
use rulesynth_adapters::{
    BackupFileWriter, GlobPatternMatcher, JsonLogger, LocalTreeScanner, MemoryLogSink,
    SystemClock, TomlCatalogStore, backup_path_for,
};
use rulesynth_app::{
    CatalogSources, ExportCatalogDeps, ExportCatalogInput, MergedCatalogCache, SynthesizeDeps,
    SynthesizeInput, export_catalog, merge_catalog_files, synthesize,
};
use rulesynth_domain::Pattern;
use rulesynth_ports::{CatalogStorePort, LogLevel, LoggerPort, WriteOutcome};
use rulesynth_shared::{ErrorCode, Outcome};
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const BASELINE: &str = r#"
Python = { patterns = ["*.py", "__pycache__/"] }
BuildArtifacts = { patterns = ["*.o", "build/"] }
Rust = { patterns = ["target/", "*.rs.bk"] }
"#;

fn write_project(root: &Path) -> Result<(), Box<dyn Error>> {
    fs::write(root.join("main.py"), "print('hi')\n")?;
    fs::write(root.join("README.md"), "# demo\n")?;
    fs::create_dir_all(root.join("build"))?;
    fs::write(root.join("build/out.o"), "")?;
    Ok(())
}

fn deps(cache: Option<Arc<MergedCatalogCache>>, logger: Option<Arc<dyn LoggerPort>>) -> SynthesizeDeps {
    SynthesizeDeps {
        scanner: Arc::new(LocalTreeScanner::new()),
        matcher: Arc::new(GlobPatternMatcher::new()),
        catalogs: Arc::new(TomlCatalogStore::new()),
        cache,
        logger,
    }
}

fn patterns_of<'a>(outcome: &'a Outcome<rulesynth_domain::MatchResult>, name: &str) -> Vec<&'a str> {
    outcome
        .value()
        .and_then(|result| result.get(name))
        .map(|patterns| patterns.iter().map(Pattern::as_str).collect())
        .unwrap_or_default()
}

#[test]
fn selects_only_relevant_categories() -> Result<(), Box<dyn Error>> {
    let catalogs = tempfile::tempdir()?;
    let project = tempfile::tempdir()?;
    let baseline_path = catalogs.path().join("baseline.toml");
    fs::write(&baseline_path, BASELINE)?;
    write_project(project.path())?;

    let input = SynthesizeInput {
        project_root: project.path().to_path_buf(),
        sources: CatalogSources {
            baseline_path,
            user_path: Some(catalogs.path().join("absent.toml")),
        },
    };

    let outcome = synthesize(&deps(None, None), &input);
    assert!(!outcome.is_fatal());
    assert!(outcome.warnings().is_empty());

    let names: Vec<String> = outcome
        .value()
        .map(|result| result.iter().map(|c| c.name.as_str().to_owned()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["Python", "BuildArtifacts"]);
    assert_eq!(patterns_of(&outcome, "Python"), vec!["*.py"]);
    assert_eq!(patterns_of(&outcome, "BuildArtifacts"), vec!["*.o", "build/"]);
    Ok(())
}

#[test]
fn user_patterns_come_first_and_bad_user_catalog_degrades() -> Result<(), Box<dyn Error>> {
    let catalogs = tempfile::tempdir()?;
    let baseline_path = catalogs.path().join("baseline.toml");
    let user_path = catalogs.path().join("user.toml");
    fs::write(&baseline_path, BASELINE)?;
    fs::write(
        &user_path,
        "Python = { patterns = [\".venv/\", \"*.py\"] }\nCustom = { patterns = [\"*.tmp\"] }\n",
    )?;
    let sources = CatalogSources {
        baseline_path: baseline_path.clone(),
        user_path: Some(user_path.clone()),
    };
    let merge_deps = deps(None, None).merge_deps();

    let merged = merge_catalog_files(&merge_deps, &sources);
    let catalog = merged.value().ok_or("merge failed")?;
    let python: Vec<&str> = catalog
        .get("Python")
        .map(|c| c.patterns.iter().map(Pattern::as_str).collect())
        .unwrap_or_default();
    assert_eq!(python, vec![".venv/", "*.py", "__pycache__/"]);
    let names: Vec<&str> = catalog.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Python", "BuildArtifacts", "Rust", "Custom"]);

    fs::write(&user_path, "not = [valid")?;
    let degraded = merge_catalog_files(&merge_deps, &sources);
    assert!(degraded.is_degraded());
    assert_eq!(
        degraded.warnings().first().map(|w| w.code.clone()),
        Some(ErrorCode::user_catalog_ignored())
    );
    let baseline_only = TomlCatalogStore::new()
        .load(&baseline_path)?
        .ok_or("baseline missing")?
        .catalog;
    assert_eq!(degraded.value(), Some(&baseline_only));
    Ok(())
}

#[test]
fn missing_baseline_is_fatal_and_logged() -> Result<(), Box<dyn Error>> {
    let catalogs = tempfile::tempdir()?;
    let project = tempfile::tempdir()?;
    let sink = Arc::new(MemoryLogSink::default());
    let logger: Arc<dyn LoggerPort> =
        Arc::new(JsonLogger::new(sink.clone()).with_min_level(LogLevel::Debug));

    let input = SynthesizeInput {
        project_root: project.path().to_path_buf(),
        sources: CatalogSources {
            baseline_path: catalogs.path().join("missing.toml"),
            user_path: None,
        },
    };
    let outcome = synthesize(&deps(None, Some(logger)), &input);
    let error = outcome.into_result().err().ok_or("expected fatal outcome")?;
    assert_eq!(error.code, ErrorCode::baseline_unavailable());

    let lines = sink.take();
    assert!(
        lines
            .iter()
            .any(|line| line.contains("catalog.baseline_unavailable"))
    );
    Ok(())
}

#[test]
fn missing_project_root_is_fatal() -> Result<(), Box<dyn Error>> {
    let catalogs = tempfile::tempdir()?;
    let baseline_path = catalogs.path().join("baseline.toml");
    fs::write(&baseline_path, BASELINE)?;

    let input = SynthesizeInput {
        project_root: catalogs.path().join("no-such-project"),
        sources: CatalogSources {
            baseline_path,
            user_path: None,
        },
    };
    let error = synthesize(&deps(None, None), &input)
        .into_result()
        .err()
        .ok_or("expected fatal outcome")?;
    assert_eq!(error.code, ErrorCode::new("scan", "root_not_found"));
    Ok(())
}

#[test]
fn cached_merge_is_reused_until_cleared() -> Result<(), Box<dyn Error>> {
    let catalogs = tempfile::tempdir()?;
    let project = tempfile::tempdir()?;
    let baseline_path = catalogs.path().join("baseline.toml");
    fs::write(&baseline_path, BASELINE)?;
    write_project(project.path())?;

    let cache = Arc::new(MergedCatalogCache::new(
        Arc::new(SystemClock),
        Duration::from_secs(300),
    ));
    let deps = deps(Some(Arc::clone(&cache)), None);
    let input = SynthesizeInput {
        project_root: project.path().to_path_buf(),
        sources: CatalogSources {
            baseline_path: baseline_path.clone(),
            user_path: None,
        },
    };

    let first = synthesize(&deps, &input);
    assert_eq!(patterns_of(&first, "Python"), vec!["*.py"]);

    // Edits on disk are invisible while the cached merge is fresh.
    fs::write(&baseline_path, "Python = { patterns = [\"*.md\"] }\n")?;
    let second = synthesize(&deps, &input);
    assert_eq!(second, first);

    cache.clear();
    let third = synthesize(&deps, &input);
    assert_eq!(patterns_of(&third, "Python"), vec!["*.md"]);
    assert!(patterns_of(&third, "BuildArtifacts").is_empty());
    Ok(())
}

#[test]
fn export_round_trips_and_backs_up() -> Result<(), Box<dyn Error>> {
    let catalogs = tempfile::tempdir()?;
    let baseline_path = catalogs.path().join("baseline.toml");
    fs::write(&baseline_path, BASELINE)?;
    let store = Arc::new(TomlCatalogStore::new());
    let catalog = store
        .load(&baseline_path)?
        .ok_or("baseline missing")?
        .catalog;

    let deps = ExportCatalogDeps {
        catalogs: store.clone(),
        writer: Arc::new(BackupFileWriter::new()),
        logger: None,
    };
    let output_path = catalogs.path().join("out/merged.toml");
    let input = ExportCatalogInput {
        catalog: catalog.clone(),
        output_path: output_path.clone(),
    };

    assert_eq!(export_catalog(&deps, &input)?, WriteOutcome::Created);
    let reloaded = store.load(&output_path)?.ok_or("export missing")?;
    assert_eq!(reloaded.catalog, catalog);
    assert!(reloaded.skipped.is_empty());

    assert_eq!(export_catalog(&deps, &input)?, WriteOutcome::Unchanged);

    fs::write(&output_path, "# edited by hand\n")?;
    let outcome = export_catalog(&deps, &input)?;
    assert_eq!(
        outcome,
        WriteOutcome::Updated {
            backup_path: backup_path_for(&output_path)
        }
    );
    assert_eq!(
        fs::read_to_string(backup_path_for(&output_path))?,
        "# edited by hand\n"
    );
    Ok(())
}

#[test]
fn readme_contributes_no_category() -> Result<(), Box<dyn Error>> {
    let catalogs = tempfile::tempdir()?;
    let project = tempfile::tempdir()?;
    let baseline_path = catalogs.path().join("baseline.toml");
    fs::write(
        &baseline_path,
        "Python = { patterns = [\"*.py\"] }\nBuildArtifacts = { patterns = [\"*.o\"] }\n",
    )?;
    write_project(project.path())?;

    let input = SynthesizeInput {
        project_root: project.path().to_path_buf(),
        sources: CatalogSources {
            baseline_path,
            user_path: None,
        },
    };
    let outcome = synthesize(&deps(None, None), &input);

    assert_eq!(patterns_of(&outcome, "Python"), vec!["*.py"]);
    assert_eq!(patterns_of(&outcome, "BuildArtifacts"), vec!["*.o"]);
    assert_eq!(outcome.value().map(|r| r.categories_count()), Some(2));
    assert_eq!(outcome.value().map(|r| r.total_rules()), Some(2));
    Ok(())
}
