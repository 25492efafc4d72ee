//! Rules Engine Runtime - cached decision trees with TTL reconciliation
//!
//! [`Cache`] maps configuration identifiers to compiled rule sets. Entries are
//! built on first use and, once older than the TTL, rechecked against their
//! [`ConfigSource`](rulesengine_repository::ConfigSource) by a sweep that
//! rebuilds only when the configuration fingerprint changed. [`Refresher`]
//! runs those sweeps in the background.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rulesengine_core::RuleSetBuilder;
//! use rulesengine_repository::FileSystemConfigSource;
//! use rulesengine_runtime::{Cache, CacheConfig};
//!
//! # async fn example(builder: Arc<dyn RuleSetBuilder<String, Vec<String>>>) -> anyhow::Result<()> {
//! let config = CacheConfig::load()?;
//! let source = Arc::new(FileSystemConfigSource::new("configs")?);
//! let cache = Arc::new(Cache::new(config, source, builder)?);
//! let refresher = cache.spawn_refresher();
//!
//! let entry = cache.get_or_build("account-42").await?;
//! if let Some(rule_set) = entry.rule_set("processed-auction-request", "device-rules") {
//!     let mut result = Vec::new();
//!     rule_set.model_groups[0].run(&"JPN".to_string(), &mut result)?;
//! }
//!
//! refresher.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod entry;
pub mod error;
pub mod fingerprint;
pub mod observer;
pub mod refresher;
pub mod stats;

pub use cache::Cache;
pub use config::CacheConfig;
pub use entry::{CacheEntry, EntryState};
pub use error::{CacheError, Result};
pub use fingerprint::Fingerprint;
pub use observer::{SweepObserver, SweepReport, TracingObserver};
pub use refresher::Refresher;
pub use stats::CacheStats;
