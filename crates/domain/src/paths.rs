//! Root-relative project paths produced by a tree scan.

use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Canonical separator used in every stored path.
pub const SEPARATOR: char = '/';

/// A normalized path relative to a project root.
///
/// Directories carry a trailing `/`; files never do.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectPath(Box<str>);

impl ProjectPath {
    /// Normalize a raw relative path.
    ///
    /// Backslashes become `/`, repeated separators collapse, and a leading
    /// `./` is dropped. Surrounding whitespace is part of the name. Returns
    /// `None` for empty, absolute, or traversing (`..`) paths.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_separators(raw);
        let mut rest = normalized.as_str();
        while let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        }
        if rest.is_empty() || rest == "." || rest == "/" || is_absolute_like(rest) {
            return None;
        }
        let is_dir = rest.ends_with(SEPARATOR);
        let body = rest.trim_end_matches(SEPARATOR);
        if body
            .split(SEPARATOR)
            .any(|segment| segment == ".." || segment.is_empty())
        {
            return None;
        }
        let stored = if is_dir {
            format!("{body}{SEPARATOR}")
        } else {
            body.to_owned()
        };
        Some(Self(stored.into_boxed_str()))
    }

    /// Build a file entry from a relative path.
    pub fn file(raw: &str) -> Option<Self> {
        let trimmed = raw.trim_end_matches(['/', '\\']);
        Self::parse(trimmed)
    }

    /// Build a directory entry from a relative path.
    pub fn directory(raw: &str) -> Option<Self> {
        let trimmed = raw.trim_end_matches(['/', '\\']);
        Self::parse(&format!("{trimmed}{SEPARATOR}"))
    }

    /// Stored text (directories end with `/`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for directory entries.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.0.ends_with(SEPARATOR)
    }

    /// Path without the directory marker.
    #[must_use]
    pub fn trimmed(&self) -> &str {
        self.0.trim_end_matches(SEPARATOR)
    }

    /// Final component of the stored text.
    ///
    /// For directories this is empty, since the stored text ends with `/`;
    /// use [`ProjectPath::name`] for the directory's own name.
    #[must_use]
    pub fn basename(&self) -> &str {
        last_component(&self.0)
    }

    /// Final component with the directory marker removed.
    #[must_use]
    pub fn name(&self) -> &str {
        last_component(self.trimmed())
    }
}

impl fmt::Display for ProjectPath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl Serialize for ProjectPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Set of root-relative paths, files and directories alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProjectPathSet {
    entries: BTreeSet<ProjectPath>,
}

impl ProjectPathSet {
    /// An empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeSet::new(),
        }
    }

    /// Insert an entry; returns false when it was already present.
    pub fn insert(&mut self, path: ProjectPath) -> bool {
        self.entries.insert(path)
    }

    /// True when the exact entry is present.
    #[must_use]
    pub fn contains(&self, raw: &str) -> bool {
        ProjectPath::parse(raw).is_some_and(|path| self.entries.contains(&path))
    }

    /// Iterate entries in lexical order.
    pub fn iter(&self) -> std::collections::btree_set::Iter<'_, ProjectPath> {
        self.entries.iter()
    }

    /// Iterate directory entries only.
    pub fn directories(&self) -> impl Iterator<Item = &ProjectPath> {
        self.entries.iter().filter(|path| path.is_dir())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for ProjectPathSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut set = Self::new();
        for raw in iter {
            if let Some(path) = ProjectPath::parse(raw) {
                set.insert(path);
            }
        }
        set
    }
}

impl<'a> IntoIterator for &'a ProjectPathSet {
    type Item = &'a ProjectPath;
    type IntoIter = std::collections::btree_set::Iter<'a, ProjectPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Replace backslashes with `/` and collapse repeated separators.
#[must_use]
pub fn normalize_separators(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut previous_was_slash = false;

    for ch in input.chars() {
        let ch = if ch == '\\' { SEPARATOR } else { ch };
        if ch == SEPARATOR {
            if previous_was_slash {
                continue;
            }
            previous_was_slash = true;
        } else {
            previous_was_slash = false;
        }
        output.push(ch);
    }

    output
}

fn last_component(path: &str) -> &str {
    path.rsplit(SEPARATOR).next().unwrap_or(path)
}

fn is_absolute_like(path: &str) -> bool {
    if path.starts_with(SEPARATOR) {
        return true;
    }
    let bytes = path.as_bytes();
    matches!(bytes, [drive, b':', b'/', ..] if drive.is_ascii_alphabetic())
}
