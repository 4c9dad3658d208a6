//! Result helpers for shared error handling.

use crate::errors::{ErrorCode, ErrorEnvelope};

/// Shared result type used across the workspace.
pub type Result<T, E = ErrorEnvelope> = std::result::Result<T, E>;

/// Extension helpers for results carrying an `ErrorEnvelope`.
pub trait ResultExt<T> {
    /// Attach a metadata entry to the error, preserving the success.
    fn with_metadata(self, key: &str, value: impl Into<String>) -> Result<T>;

    /// Replace the error code, preserving message and metadata.
    fn with_code(self, code: ErrorCode) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_metadata(self, key: &str, value: impl Into<String>) -> Self {
        self.map_err(|error| error.with_metadata(key, value))
    }

    fn with_code(self, code: ErrorCode) -> Self {
        self.map_err(|error| error.with_code(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_ext_attaches_metadata() {
        let value: Result<i32> = Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "bad input",
        ));
        let mapped = value.with_metadata("field", "name");

        assert!(mapped.is_err());
        if let Err(error) = mapped {
            assert_eq!(
                error.metadata.get("field").map(String::as_str),
                Some("name")
            );
        }
    }

    #[test]
    fn result_ext_keeps_ok_values() {
        let value: Result<i32> = Ok(2);
        assert!(matches!(value.with_code(ErrorCode::io()), Ok(2)));
    }

    #[test]
    fn result_ext_replaces_code() {
        let value: Result<()> = Err(ErrorEnvelope::expected(ErrorCode::io(), "disk"));
        let mapped = value.with_code(ErrorCode::baseline_unavailable());
        assert!(matches!(
            mapped,
            Err(ref error) if error.code == ErrorCode::baseline_unavailable()
        ));
    }
}
