//! Cache of compiled rule sets keyed by configuration identifier
//!
//! Lookups are synchronous and never wait on I/O. Misses are filled by
//! [`Cache::get_or_build`], and entries older than the TTL are reconciled
//! against their source by [`Cache::sweep`]: a fingerprint match only moves
//! the refresh time, a mismatch rebuilds the trees. No lock is held while
//! fetching or building.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rulesengine_core::{RuleSet, RuleSetBuilder};
use rulesengine_repository::{ConfigSource, FetchedConfig};

use crate::config::CacheConfig;
use crate::entry::{CacheEntry, EntryState};
use crate::error::{CacheError, Result};
use crate::fingerprint::Fingerprint;
use crate::observer::{SweepObserver, SweepReport, TracingObserver};
use crate::stats::{CacheMetrics, CacheStats};

type EntryMap<P, R> = HashMap<String, Arc<CacheEntry<P, R>>>;

/// Outcome of reconciling one stale entry
enum Reconciled<P, R> {
    Refreshed(CacheEntry<P, R>),
    Rebuilt(CacheEntry<P, R>),
}

/// Concurrent cache of compiled rule sets
///
/// Share it behind an [`Arc`]; every method takes `&self`.
pub struct Cache<P, R> {
    entries: RwLock<EntryMap<P, R>>,
    reconciling: Mutex<HashSet<String>>,
    source: Arc<dyn ConfigSource>,
    builder: Arc<dyn RuleSetBuilder<P, R>>,
    observer: Arc<dyn SweepObserver>,
    config: CacheConfig,
    metrics: CacheMetrics,
}

impl<P, R> Cache<P, R> {
    /// Create an empty cache
    ///
    /// `source` supplies raw configuration on misses and sweeps; `builder`
    /// compiles it. Sweep outcomes are logged through [`TracingObserver`]
    /// unless another observer is set with [`Cache::with_observer`].
    ///
    /// Fails with [`CacheError::Config`] if `config` does not validate.
    pub fn new(
        config: CacheConfig,
        source: Arc<dyn ConfigSource>,
        builder: Arc<dyn RuleSetBuilder<P, R>>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            entries: RwLock::new(HashMap::new()),
            reconciling: Mutex::new(HashSet::new()),
            source,
            builder,
            observer: Arc::new(TracingObserver),
            config,
            metrics: CacheMetrics::default(),
        })
    }

    /// Report sweep outcomes to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn SweepObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get the entry for `id`
    pub fn get(&self, id: &str) -> Option<Arc<CacheEntry<P, R>>> {
        let entry = self.read_entries().get(id).cloned();
        match entry {
            Some(_) => self.metrics.record_hit(),
            None => self.metrics.record_miss(),
        }
        entry
    }

    /// Install `entry` for `id`, returning the entry it replaced
    pub fn set(&self, id: impl Into<String>, entry: CacheEntry<P, R>) -> Option<Arc<CacheEntry<P, R>>> {
        let id = id.into();
        tracing::debug!(id = %id, fingerprint = %entry.fingerprint, "cache entry set");
        self.write_entries().insert(id, Arc::new(entry))
    }

    /// Remove the entry for `id`
    pub fn delete(&self, id: &str) -> Option<Arc<CacheEntry<P, R>>> {
        let removed = self.write_entries().remove(id);
        if removed.is_some() {
            tracing::debug!(id, "cache entry deleted");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    /// Identifiers currently cached, in no particular order
    pub fn ids(&self) -> Vec<String> {
        self.read_entries().keys().cloned().collect()
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.write_entries().clear();
    }

    /// Lifecycle state of the entry for `id`, if cached
    pub fn state(&self, id: &str) -> Option<EntryState> {
        let entry = self.read_entries().get(id).cloned()?;
        if self.lock_reconciling().contains(id) {
            Some(EntryState::Reconciling)
        } else if entry.is_stale(self.config.ttl()) {
            Some(EntryState::Stale)
        } else {
            Some(EntryState::Fresh)
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.len())
    }

    /// Get the entry for `id`, building it from the source on a miss
    ///
    /// Fetch, build and validation errors are returned and nothing is
    /// installed. If another caller installed an entry while this one was
    /// building, that entry wins and is returned.
    pub async fn get_or_build(&self, id: &str) -> Result<Arc<CacheEntry<P, R>>> {
        if let Some(entry) = self.get(id) {
            return Ok(entry);
        }

        let entry = match self.load(id).await {
            Ok(entry) => entry,
            Err(e) => {
                self.metrics.record_failure();
                tracing::warn!(id, kind = e.kind(), error = %e, "failed to build cache entry");
                return Err(e);
            }
        };

        self.metrics.record_build();
        tracing::info!(
            id,
            fingerprint = %entry.fingerprint,
            rule_sets = entry.rule_sets.len(),
            "cache entry built"
        );

        let installed = Arc::clone(
            self.write_entries()
                .entry(id.to_string())
                .or_insert_with(|| Arc::new(entry)),
        );
        Ok(installed)
    }

    /// Reconcile every entry that has reached the TTL
    ///
    /// Fresh entries are not touched. A stale entry whose configuration is
    /// unchanged gets a new refresh time and keeps its trees; a changed one is
    /// rebuilt. Failures leave the stale entry in place to be retried on the
    /// next sweep.
    pub async fn sweep(&self) -> SweepReport {
        let ttl = self.config.ttl();
        let stale: Vec<(String, Arc<CacheEntry<P, R>>)> = self
            .read_entries()
            .iter()
            .filter(|(_, entry)| entry.is_stale(ttl))
            .map(|(id, entry)| (id.clone(), Arc::clone(entry)))
            .collect();

        let mut report = SweepReport::default();
        for (id, current) in stale {
            report.checked += 1;

            let Some(_guard) = self.claim(&id) else {
                tracing::debug!(id = %id, "entry already being reconciled");
                report.skipped += 1;
                continue;
            };

            match self.reconcile(&id, &current).await {
                Ok(Reconciled::Refreshed(entry)) => {
                    if self.replace_if_current(&id, &current, entry) {
                        self.metrics.record_refresh();
                        self.observer.on_refreshed(&id);
                        report.refreshed += 1;
                    } else {
                        report.skipped += 1;
                    }
                }
                Ok(Reconciled::Rebuilt(entry)) => {
                    if self.replace_if_current(&id, &current, entry) {
                        self.metrics.record_rebuild();
                        self.observer.on_rebuilt(&id);
                        report.rebuilt += 1;
                    } else {
                        report.skipped += 1;
                    }
                }
                Err(e) => {
                    self.metrics.record_failure();
                    self.observer.on_failure(&id, &e);
                    report.failed += 1;
                }
            }
        }

        if report.checked > 0 {
            tracing::debug!(?report, "sweep finished");
        }
        report
    }

    /// Fetch and compile `id` into a new entry
    async fn load(&self, id: &str) -> Result<CacheEntry<P, R>> {
        let fetched = self.fetch(id).await?;
        let fingerprint = Fingerprint::of(&fetched.bytes);
        let rule_sets = self.compile(&fetched)?;
        Ok(CacheEntry::new(fingerprint, rule_sets))
    }

    async fn reconcile(
        &self,
        id: &str,
        current: &CacheEntry<P, R>,
    ) -> Result<Reconciled<P, R>> {
        let fetched = self.fetch(id).await?;
        let fingerprint = Fingerprint::of(&fetched.bytes);

        if fingerprint == current.fingerprint {
            return Ok(Reconciled::Refreshed(current.refreshed()));
        }

        tracing::debug!(
            id,
            old = %current.fingerprint,
            new = %fingerprint,
            "configuration fingerprint changed"
        );
        let rule_sets = self.compile(&fetched)?;
        Ok(Reconciled::Rebuilt(CacheEntry::new(fingerprint, rule_sets)))
    }

    async fn fetch(&self, id: &str) -> Result<FetchedConfig> {
        let timeout = self.config.fetch_timeout();
        match tokio::time::timeout(timeout, self.source.fetch(id)).await {
            Ok(Ok(fetched)) => Ok(fetched),
            Ok(Err(source)) => Err(CacheError::Fetch {
                id: id.to_string(),
                source,
            }),
            Err(_) => Err(CacheError::FetchTimeout {
                id: id.to_string(),
                timeout,
            }),
        }
    }

    fn compile(&self, fetched: &FetchedConfig) -> Result<Vec<RuleSet<P, R>>> {
        Ok(self.builder.build(&fetched.bytes)?)
    }

    /// Install `entry` only if `id` still maps to `current`
    fn replace_if_current(
        &self,
        id: &str,
        current: &Arc<CacheEntry<P, R>>,
        entry: CacheEntry<P, R>,
    ) -> bool {
        let mut entries = self.write_entries();
        match entries.get_mut(id) {
            Some(slot) if Arc::ptr_eq(slot, current) => {
                *slot = Arc::new(entry);
                true
            }
            _ => {
                tracing::debug!(id, "entry changed during reconcile, discarding result");
                false
            }
        }
    }

    /// Mark `id` as reconciling until the guard drops
    fn claim(&self, id: &str) -> Option<ReconcileGuard<'_>> {
        if !self.lock_reconciling().insert(id.to_string()) {
            return None;
        }
        Some(ReconcileGuard {
            reconciling: &self.reconciling,
            id: id.to_string(),
        })
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, EntryMap<P, R>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, EntryMap<P, R>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_reconciling(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.reconciling.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct ReconcileGuard<'a> {
    reconciling: &'a Mutex<HashSet<String>>,
    id: String,
}

impl Drop for ReconcileGuard<'_> {
    fn drop(&mut self) {
        self.reconciling
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}
