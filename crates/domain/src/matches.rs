//! Per-project selection of catalog rules.

use crate::catalog::CategoryName;
use crate::pattern::Pattern;
use serde::Serialize;

/// Matching rules of one category, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMatches {
    /// Category name.
    pub name: CategoryName,
    /// Patterns that matched at least one project path.
    pub patterns: Vec<Pattern>,
}

/// Ordered mapping from category to the patterns a project needs.
///
/// A category is present only if at least one of its patterns matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchResult {
    categories: Vec<CategoryMatches>,
}

impl MatchResult {
    /// An empty result.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Record a category's matches. Empty pattern lists are dropped.
    ///
    /// Returns true when the category was recorded.
    pub fn push(&mut self, name: CategoryName, patterns: Vec<Pattern>) -> bool {
        if patterns.is_empty() {
            return false;
        }
        self.categories.push(CategoryMatches { name, patterns });
        true
    }

    /// Look up a category's matching patterns.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Pattern]> {
        self.categories
            .iter()
            .find(|entry| entry.name.as_str() == name)
            .map(|entry| entry.patterns.as_slice())
    }

    /// Iterate categories in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, CategoryMatches> {
        self.categories.iter()
    }

    /// Number of categories with at least one match.
    #[must_use]
    pub const fn categories_count(&self) -> usize {
        self.categories.len()
    }

    /// Total number of matching patterns.
    #[must_use]
    pub fn total_rules(&self) -> usize {
        self.categories
            .iter()
            .map(|entry| entry.patterns.len())
            .sum()
    }

    /// True when no category matched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<'a> IntoIterator for &'a MatchResult {
    type Item = &'a CategoryMatches;
    type IntoIter = std::slice::Iter<'a, CategoryMatches>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(value: &str) -> CategoryName {
        CategoryName::new(value).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn empty_categories_are_not_recorded() {
        let mut result = MatchResult::new();
        assert!(!result.push(name("Rust"), Vec::new()));
        assert!(result.push(name("Python"), vec![Pattern::new("*.py")]));
        assert!(result.get("Rust").is_none());
        assert_eq!(result.categories_count(), 1);
    }

    #[test]
    fn counts_rules_across_categories() {
        let mut result = MatchResult::new();
        result.push(name("A"), vec![Pattern::new("a"), Pattern::new("b")]);
        result.push(name("B"), vec![Pattern::new("c")]);
        assert_eq!(result.total_rules(), 3);
        let names: Vec<&str> = result.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
