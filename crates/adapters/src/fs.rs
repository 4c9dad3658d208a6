//! Local project-tree scanner.

use rulesynth_domain::{ProjectPath, ProjectPathSet, SEPARATOR};
use rulesynth_ports::ProjectScannerPort;
use rulesynth_shared::{ErrorCode, ErrorEnvelope, Outcome};
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Scanner walking the local filesystem with blocking IO.
///
/// Symbolic links are never recorded or followed. Directories that cannot be
/// read below the root are skipped and reported as warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTreeScanner;

impl LocalTreeScanner {
    /// Build a scanner.
    pub const fn new() -> Self {
        Self
    }
}

impl ProjectScannerPort for LocalTreeScanner {
    fn scan(&self, root: &Path) -> Outcome<ProjectPathSet> {
        if let Err(error) = check_root(root) {
            return Outcome::Fatal(error);
        }

        let mut paths = ProjectPathSet::new();
        let mut warnings = Vec::new();
        let mut dirs: VecDeque<(PathBuf, String)> = VecDeque::from([(root.to_path_buf(), String::new())]);

        while let Some((dir, rel_dir)) = dirs.pop_front() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(error) if rel_dir.is_empty() => {
                    return Outcome::Fatal(root_error(
                        "root_unreadable",
                        "project root is not readable",
                        root,
                        &error,
                    ));
                },
                Err(error) => {
                    warnings.push(dir_read_warning(&rel_dir, &error));
                    continue;
                },
            };

            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(error) => {
                        warnings.push(dir_read_warning(&rel_dir, &error));
                        continue;
                    },
                };
                let Ok(file_type) = entry.file_type() else {
                    continue;
                };
                if file_type.is_symlink() {
                    continue;
                }
                let file_name = entry.file_name();
                // Non UTF-8 names are recorded lossily; the walk uses the real path.
                let name = file_name.to_string_lossy();
                let rel = join_relative(&rel_dir, &name);

                if file_type.is_dir() {
                    if let Some(path) = ProjectPath::directory(&rel) {
                        paths.insert(path);
                        dirs.push_back((entry.path(), rel));
                    }
                } else if file_type.is_file() {
                    if let Some(path) = ProjectPath::file(&rel) {
                        paths.insert(path);
                    }
                }
            }
        }

        tracing::debug!(entries = paths.len(), skipped = warnings.len(), "tree scan finished");
        Outcome::from_parts(paths, warnings)
    }
}

fn check_root(root: &Path) -> Result<(), ErrorEnvelope> {
    match fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(ErrorEnvelope::expected(
            ErrorCode::new("scan", "root_not_directory"),
            "project root is not a directory",
        )
        .with_metadata("root", root.display().to_string())),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Err(root_error(
            "root_not_found",
            "project root does not exist",
            root,
            &error,
        )),
        Err(error) => Err(root_error(
            "root_unreadable",
            "project root is not readable",
            root,
            &error,
        )),
    }
}

fn root_error(code: &str, message: &str, root: &Path, error: &io::Error) -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::new("scan", code), format!("{message}: {error}"))
        .with_metadata("root", root.display().to_string())
}

fn dir_read_warning(rel_dir: &str, error: &io::Error) -> ErrorEnvelope {
    let dir = if rel_dir.is_empty() { "." } else { rel_dir };
    ErrorEnvelope::expected(
        ErrorCode::new("scan", "dir_read_failed"),
        format!("cannot read directory during scan: {error}"),
    )
    .with_metadata("dir", dir)
}

fn join_relative(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{dir}{SEPARATOR}{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_relative_handles_root() {
        assert_eq!(join_relative("", "main.py"), "main.py");
        assert_eq!(join_relative("build", "out.o"), "build/out.o");
    }

    #[test]
    fn missing_root_is_fatal() {
        let outcome = LocalTreeScanner::new().scan(Path::new("/definitely/not/a/project"));
        let Outcome::Fatal(error) = outcome else {
            unreachable!("missing root must be fatal");
        };
        assert_eq!(error.code, ErrorCode::new("scan", "root_not_found"));
    }
}
