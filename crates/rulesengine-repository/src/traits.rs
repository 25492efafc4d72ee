//! Configuration source trait
//!
//! A [`ConfigSource`] returns the raw configuration bytes for an identifier.
//! The cache calls it on a miss and again on every sweep of a stale entry, so
//! implementations must support repeated fetches of the same identifier.
//!
//! # Example
//!
//! ```no_run
//! use rulesengine_repository::{ConfigSource, FileSystemConfigSource};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let source = FileSystemConfigSource::new("configs")?;
//!
//! // Reads configs/account-42.json
//! let fetched = source.fetch("account-42").await?;
//! println!("{} bytes fetched at {}", fetched.bytes.len(), fetched.fetched_at);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::{FetchedConfig, RepositoryResult};

/// Source of raw configuration bytes
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the cache shares one source between
/// request handlers and the background refresher.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Fetch the current configuration for `id`
    ///
    /// Failures are treated as transient by the cache: the previous entry
    /// stays in place and the fetch is retried on the next sweep.
    async fn fetch(&self, id: &str) -> RepositoryResult<FetchedConfig>;

    /// Check whether configuration exists for `id`
    async fn exists(&self, id: &str) -> RepositoryResult<bool> {
        match self.fetch(id).await {
            Ok(_) => Ok(true),
            Err(crate::RepositoryError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
