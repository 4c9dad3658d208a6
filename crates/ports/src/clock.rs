//! Monotonic time source.

use std::time::Instant;

/// Boundary contract for reading the current time.
pub trait ClockPort: Send + Sync {
    /// Current monotonic instant.
    fn now(&self) -> Instant;
}
