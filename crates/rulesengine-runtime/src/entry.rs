//! Cache entries

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rulesengine_core::RuleSet;
use tokio::time::Instant;

use crate::fingerprint::Fingerprint;

/// Lifecycle state of a cached entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Younger than the TTL
    Fresh,
    /// At or past the TTL, waiting for the next sweep
    Stale,
    /// Being fetched, compared or rebuilt by a sweep
    Reconciling,
}

/// Compiled configuration for one identifier
///
/// Entries are immutable. Refreshes and rebuilds install a new entry; a
/// refresh that found unchanged configuration shares `rule_sets` with the
/// entry it replaces.
pub struct CacheEntry<P, R> {
    /// When the entry was built or last confirmed against its source
    pub last_refreshed_at: Instant,

    /// Fingerprint of the configuration the rule sets were built from
    pub fingerprint: Fingerprint,

    /// Compiled rule sets
    pub rule_sets: Arc<Vec<RuleSet<P, R>>>,
}

impl<P, R> CacheEntry<P, R> {
    /// Create an entry refreshed now
    pub fn new(fingerprint: Fingerprint, rule_sets: Vec<RuleSet<P, R>>) -> Self {
        Self {
            last_refreshed_at: Instant::now(),
            fingerprint,
            rule_sets: Arc::new(rule_sets),
        }
    }

    /// Copy of this entry with a new refresh time and the same rule sets
    pub fn refreshed(&self) -> Self {
        Self {
            last_refreshed_at: Instant::now(),
            fingerprint: self.fingerprint,
            rule_sets: Arc::clone(&self.rule_sets),
        }
    }

    /// Time since the last refresh
    pub fn age(&self) -> Duration {
        self.last_refreshed_at.elapsed()
    }

    /// Whether the entry has reached `ttl`
    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }

    /// Whether both entries hold the same compiled rule sets
    pub fn shares_rule_sets(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rule_sets, &other.rule_sets)
    }

    /// Find a rule set by stage and name
    pub fn rule_set(&self, stage: &str, name: &str) -> Option<&RuleSet<P, R>> {
        self.rule_sets
            .iter()
            .find(|rs| rs.stage == stage && rs.name == name)
    }

    /// All rule sets for a stage, in configuration order
    pub fn rule_sets_for_stage<'a>(&'a self, stage: &'a str) -> impl Iterator<Item = &'a RuleSet<P, R>> + 'a {
        self.rule_sets.iter().filter(move |rs| rs.stage == stage)
    }
}

impl<P, R> fmt::Debug for CacheEntry<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("age", &self.age())
            .field("fingerprint", &self.fingerprint)
            .field("rule_sets", &self.rule_sets.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_set(stage: &str, name: &str) -> RuleSet<(), ()> {
        RuleSet {
            stage: stage.to_string(),
            name: name.to_string(),
            model_groups: Vec::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_staleness_follows_ttl() {
        let entry: CacheEntry<(), ()> = CacheEntry::new(Fingerprint::of(b"{}"), Vec::new());
        let ttl = Duration::from_secs(60);

        assert!(!entry.is_stale(ttl));
        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(!entry.is_stale(ttl));
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(entry.is_stale(ttl));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshed_shares_rule_sets() {
        let entry = CacheEntry::new(Fingerprint::of(b"{}"), vec![rule_set("s", "n")]);
        tokio::time::advance(Duration::from_secs(10)).await;

        let refreshed = entry.refreshed();
        assert!(refreshed.shares_rule_sets(&entry));
        assert_eq!(refreshed.fingerprint, entry.fingerprint);
        assert!(refreshed.last_refreshed_at > entry.last_refreshed_at);
        assert_eq!(refreshed.age(), Duration::ZERO);
    }

    #[test]
    fn test_rule_set_lookup() {
        let entry = CacheEntry::new(
            Fingerprint::of(b"{}"),
            vec![rule_set("a", "one"), rule_set("b", "two"), rule_set("a", "three")],
        );

        assert_eq!(entry.rule_set("b", "two").unwrap().name, "two");
        assert!(entry.rule_set("b", "one").is_none());
        let names: Vec<&str> = entry
            .rule_sets_for_stage("a")
            .map(|rs| rs.name.as_str())
            .collect();
        assert_eq!(names, vec!["one", "three"]);
    }
}
