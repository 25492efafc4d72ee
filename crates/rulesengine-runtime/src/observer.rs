//! Sweep outcome reporting
//!
//! Sweeps run in the background with no caller waiting on them, so their
//! outcomes are handed to a [`SweepObserver`] instead of being returned.

use crate::error::CacheError;

/// Receives the outcome of each reconciled entry
pub trait SweepObserver: Send + Sync {
    /// Configuration was unchanged; only the refresh time moved
    fn on_refreshed(&self, _id: &str) {}

    /// Configuration changed and the trees were rebuilt
    fn on_rebuilt(&self, _id: &str) {}

    /// Fetch, build or validation failed; the previous entry is still served
    fn on_failure(&self, id: &str, error: &CacheError);
}

/// Observer that logs outcomes with `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SweepObserver for TracingObserver {
    fn on_refreshed(&self, id: &str) {
        tracing::debug!(id, "configuration unchanged, entry refreshed");
    }

    fn on_rebuilt(&self, id: &str) {
        tracing::info!(id, "configuration changed, entry rebuilt");
    }

    fn on_failure(&self, id: &str, error: &CacheError) {
        tracing::warn!(
            id,
            kind = error.kind(),
            error = %error,
            "failed to reconcile entry, serving stale entry"
        );
    }
}

/// Summary of one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Stale entries examined
    pub checked: usize,
    /// Entries whose timestamp was refreshed without rebuilding
    pub refreshed: usize,
    /// Entries rebuilt from changed configuration
    pub rebuilt: usize,
    /// Entries left stale after a failure
    pub failed: usize,
    /// Entries replaced, deleted or already claimed by a concurrent sweep
    pub skipped: usize,
}
