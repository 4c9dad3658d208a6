//! System clock adapter.

use rulesynth_ports::ClockPort;
use std::time::Instant;

/// Monotonic clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
