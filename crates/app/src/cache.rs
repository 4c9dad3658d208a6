//! Time-bounded memo of the merged catalog.

use rulesynth_domain::Catalog;
use rulesynth_ports::ClockPort;
use rulesynth_shared::Outcome;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Default lifetime of a cached merge.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

struct CacheEntry {
    outcome: Outcome<Catalog>,
    stored_at: Instant,
}

/// Single-slot cache for the merged catalog.
///
/// The lock is held while `compute` runs, so concurrent callers never merge
/// twice. Fatal outcomes are returned but never stored. Callers get clones;
/// the stored value cannot be mutated from outside.
pub struct MergedCatalogCache {
    clock: Arc<dyn ClockPort>,
    ttl: Duration,
    slot: Mutex<Option<CacheEntry>>,
}

impl MergedCatalogCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new(clock: Arc<dyn ClockPort>, ttl: Duration) -> Self {
        Self {
            clock,
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Entry lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached outcome while fresh, otherwise compute and store it.
    pub fn get_or_compute<F>(&self, compute: F) -> Outcome<Catalog>
    where
        F: FnOnce() -> Outcome<Catalog>,
    {
        let mut slot = self.lock();
        let now = self.clock.now();

        if let Some(entry) = slot.as_ref() {
            if now.saturating_duration_since(entry.stored_at) < self.ttl {
                tracing::debug!("merged catalog served from cache");
                return entry.outcome.clone();
            }
        }

        let outcome = compute();
        *slot = if outcome.is_fatal() {
            None
        } else {
            Some(CacheEntry {
                outcome: outcome.clone(),
                stored_at: now,
            })
        };
        outcome
    }

    /// Drop the cached entry unconditionally.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    /// True when an entry is stored and still fresh.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        let now = self.clock.now();
        self.lock()
            .as_ref()
            .is_some_and(|entry| now.saturating_duration_since(entry.stored_at) < self.ttl)
    }

    fn lock(&self) -> MutexGuard<'_, Option<CacheEntry>> {
        // A panic inside `compute` leaves the slot untouched, so the data is
        // still consistent after poisoning.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for MergedCatalogCache {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("MergedCatalogCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
