//! Registry metrics and observability.
//!
//! Tracks lookup hit/miss counts and reload outcomes for one registry.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for one `TranslationRegistry`.
#[derive(Debug, Default)]
pub struct RegistryMetrics {
    /// Lookups that found a template somewhere along the fallback chain
    lookup_hits: AtomicUsize,

    /// Lookups that found nothing
    lookup_misses: AtomicUsize,

    /// Reloads that installed a new snapshot
    reload_successes: AtomicUsize,

    /// Reloads that kept the previous snapshot
    reload_failures: AtomicUsize,
}

impl RegistryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup that found a template.
    pub fn record_hit(&self) {
        self.lookup_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup that found nothing.
    pub fn record_miss(&self) {
        self.lookup_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a reload that replaced the live snapshot.
    pub fn record_reload_success(&self) {
        self.reload_successes.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a reload that left the live snapshot in place.
    pub fn record_reload_failure(&self) {
        self.reload_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current lookup hit count.
    pub fn lookup_hits(&self) -> usize {
        self.lookup_hits.load(Ordering::Relaxed)
    }

    /// Get the current lookup miss count.
    pub fn lookup_misses(&self) -> usize {
        self.lookup_misses.load(Ordering::Relaxed)
    }

    /// Get the number of reloads that published a new snapshot.
    pub fn reload_successes(&self) -> usize {
        self.reload_successes.load(Ordering::Relaxed)
    }

    /// Get the number of reloads that kept the previous snapshot.
    pub fn reload_failures(&self) -> usize {
        self.reload_failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.lookup_hits();
        let misses = self.lookup_misses();
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            lookup_hits: hits,
            lookup_misses: misses,
            hit_rate,
            reload_successes: self.reload_successes(),
            reload_failures: self.reload_failures(),
        }
    }
}

/// Point-in-time copy of the registry counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of lookups that found a template
    pub lookup_hits: usize,

    /// Number of lookups that found nothing
    pub lookup_misses: usize,

    /// Hit rate as a percentage (0-100)
    pub hit_rate: f64,

    /// Number of reloads that installed a new snapshot
    pub reload_successes: usize,

    /// Number of reloads that kept the previous snapshot
    pub reload_failures: usize,
}
