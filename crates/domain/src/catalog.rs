//! Rule catalogs: named categories of patterns.
//!
//! A [`Catalog`] can only be built through [`Catalog::new`], which rejects
//! blank and duplicate category names, so every value in circulation already
//! satisfies the catalog invariants.

use crate::pattern::{Pattern, dedupe_patterns};
use rulesynth_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Validation failures for catalog construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A category name is empty after trimming.
    #[error("category name must not be blank")]
    BlankCategoryName,
    /// The same category name appears twice.
    #[error("duplicate category: {name}")]
    DuplicateCategory {
        /// Offending category name.
        name: String,
    },
}

impl From<CatalogError> for ErrorEnvelope {
    fn from(error: CatalogError) -> Self {
        let envelope = Self::expected(ErrorCode::catalog_validation(), error.to_string());
        match error {
            CatalogError::BlankCategoryName => envelope,
            CatalogError::DuplicateCategory { name } => envelope.with_metadata("category", name),
        }
    }
}

/// Non-blank category name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(Box<str>);

impl CategoryName {
    /// Validate a category name. Surrounding whitespace is kept as written.
    pub fn new(name: impl Into<String>) -> Result<Self, CatalogError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogError::BlankCategoryName);
        }
        Ok(Self(name.into_boxed_str()))
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl TryFrom<String> for CategoryName {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryName> for String {
    fn from(value: CategoryName) -> Self {
        value.0.into_string()
    }
}

/// A named, ordered list of patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category name (unique within a catalog).
    pub name: CategoryName,
    /// Patterns in authoring order.
    pub patterns: Vec<Pattern>,
}

impl Category {
    /// Build a category from a validated name and patterns.
    pub const fn new(name: CategoryName, patterns: Vec<Pattern>) -> Self {
        Self { name, patterns }
    }
}

/// Ordered mapping from category name to patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate category names.
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        for (index, category) in categories.iter().enumerate() {
            let earlier = categories.get(..index).unwrap_or_default();
            if earlier.iter().any(|other| other.name == category.name) {
                return Err(CatalogError::DuplicateCategory {
                    name: category.name.to_string(),
                });
            }
        }
        Ok(Self { categories })
    }

    /// An empty catalog.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Look up a category by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.name.as_str() == name)
    }

    /// Iterate categories in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }

    /// Number of categories.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.categories.len()
    }

    /// True when there are no categories.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of patterns across all categories.
    #[must_use]
    pub fn total_patterns(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.patterns.len())
            .sum()
    }

    /// Consume the catalog and return its categories.
    #[must_use]
    pub fn into_categories(self) -> Vec<Category> {
        self.categories
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

/// Merge a user catalog into a baseline catalog.
///
/// Baseline categories keep their position; user-only categories are appended
/// in user order with their patterns untouched. For a category present in
/// both, the result is `dedupe(user ++ baseline)`, so user entries come first
/// and win ties.
pub fn merge_catalogs(baseline: &Catalog, user: &Catalog) -> Result<Catalog, CatalogError> {
    let mut merged: Vec<Category> = baseline.categories.clone();
    for user_category in &user.categories {
        if let Some(existing) = merged
            .iter_mut()
            .find(|category| category.name == user_category.name)
        {
            let combined = user_category
                .patterns
                .iter()
                .cloned()
                .chain(existing.patterns.drain(..))
                .collect::<Vec<_>>();
            existing.patterns = dedupe_patterns(combined);
        } else {
            merged.push(user_category.clone());
        }
    }
    Catalog::new(merged)
}
