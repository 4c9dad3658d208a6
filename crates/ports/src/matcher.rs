//! Pattern matching boundary contract.

use rulesynth_domain::{Pattern, ProjectPathSet};

/// Boundary contract for deciding whether a rule is needed by a project.
pub trait PatternMatcherPort: Send + Sync {
    /// Returns true when `pattern` matches at least one entry of `paths`.
    fn matches(&self, pattern: &Pattern, paths: &ProjectPathSet) -> bool;
}
