//! # rulesynth-shared
//!
//! Shared result types and error handling for the rulesynth workspace.
//!
//! This crate provides foundational types that are used across all other crates:
//!
//! - Result and error envelope types
//! - `Outcome`, the clean/degraded/fatal result for best-effort operations
//!
//! ## Design Principles
//!
//! 1. **No workspace dependencies** - This crate only depends on external crates
//! 2. **Serde-compatible** - Error types support serialization

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod outcome;
pub mod result;

pub use errors::{ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata};
pub use outcome::Outcome;
pub use result::{Result, ResultExt};

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_error_types_are_available() {
        let error = ErrorEnvelope::expected(ErrorCode::invalid_input(), "invalid");
        assert_eq!(error.kind, ErrorKind::Expected);
        assert_eq!(error.class, ErrorClass::NonRetriable);
    }

    #[test]
    fn shared_crate_version_is_set() {
        assert!(!shared_crate_version().is_empty());
    }
}
