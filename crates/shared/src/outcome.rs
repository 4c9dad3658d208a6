//! Three-way result for best-effort operations.
//!
//! Operations that can fall back to a reduced answer report it here instead of
//! only logging it, so callers can tell a clean answer from a degraded one.

use crate::errors::ErrorEnvelope;
use crate::result::Result;

/// Result of an operation that may succeed in a degraded way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Full success.
    Clean(T),
    /// Success after one or more local fallbacks.
    Degraded {
        /// Best-effort value.
        value: T,
        /// What was recovered from, in the order it happened.
        warnings: Vec<ErrorEnvelope>,
    },
    /// Unrecoverable failure.
    Fatal(ErrorEnvelope),
}

impl<T> Outcome<T> {
    /// Build a clean or degraded outcome depending on whether warnings exist.
    pub fn from_parts(value: T, warnings: Vec<ErrorEnvelope>) -> Self {
        if warnings.is_empty() {
            Self::Clean(value)
        } else {
            Self::Degraded { value, warnings }
        }
    }

    /// Returns true when a fallback happened.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Returns true for an unrecoverable failure.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// Borrow the value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Clean(value) | Self::Degraded { value, .. } => Some(value),
            Self::Fatal(_) => None,
        }
    }

    /// Borrow the warnings (empty for clean and fatal outcomes).
    #[must_use]
    pub fn warnings(&self) -> &[ErrorEnvelope] {
        match self {
            Self::Degraded { warnings, .. } => warnings,
            Self::Clean(_) | Self::Fatal(_) => &[],
        }
    }

    /// Map the value, keeping warnings.
    pub fn map<U, F>(self, op: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Clean(value) => Outcome::Clean(op(value)),
            Self::Degraded { value, warnings } => Outcome::Degraded {
                value: op(value),
                warnings,
            },
            Self::Fatal(error) => Outcome::Fatal(error),
        }
    }

    /// Append warnings; a clean outcome becomes degraded when any are added.
    #[must_use]
    pub fn with_warnings(self, extra: Vec<ErrorEnvelope>) -> Self {
        if extra.is_empty() {
            return self;
        }
        match self {
            Self::Clean(value) => Self::Degraded {
                value,
                warnings: extra,
            },
            Self::Degraded {
                value,
                mut warnings,
            } => {
                warnings.extend(extra);
                Self::Degraded { value, warnings }
            },
            Self::Fatal(error) => Self::Fatal(error),
        }
    }

    /// Split into a standard result of `(value, warnings)`.
    pub fn into_result(self) -> Result<(T, Vec<ErrorEnvelope>)> {
        match self {
            Self::Clean(value) => Ok((value, Vec::new())),
            Self::Degraded { value, warnings } => Ok((value, warnings)),
            Self::Fatal(error) => Err(error),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Clean(value),
            Err(error) => Self::Fatal(error),
        }
    }
}
