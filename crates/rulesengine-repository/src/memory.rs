//! In-memory configuration source

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::{ConfigSource, FetchedConfig, RepositoryError, RepositoryResult};

/// Configuration source backed by a map
///
/// Useful for embedding and tests: configuration can be replaced at any time
/// and the next fetch observes the change.
#[derive(Default)]
pub struct MemoryConfigSource {
    configs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryConfigSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace) the configuration for `id`
    pub async fn insert(&self, id: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.configs.write().await.insert(id.into(), bytes.into());
    }

    /// Remove the configuration for `id`
    pub async fn remove(&self, id: &str) -> Option<Vec<u8>> {
        self.configs.write().await.remove(id)
    }

    /// Number of stored configurations
    pub async fn len(&self) -> usize {
        self.configs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.configs.read().await.is_empty()
    }
}

#[async_trait]
impl ConfigSource for MemoryConfigSource {
    async fn fetch(&self, id: &str) -> RepositoryResult<FetchedConfig> {
        let configs = self.configs.read().await;
        configs
            .get(id)
            .map(|bytes| FetchedConfig::new(id, bytes.clone()))
            .ok_or_else(|| RepositoryError::NotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_fetch_remove() {
        let source = MemoryConfigSource::new();
        assert!(source.is_empty().await);

        source.insert("a", r#"{"ruleSets": []}"#).await;
        let fetched = source.fetch("a").await.unwrap();
        assert_eq!(fetched.id, "a");
        assert_eq!(fetched.bytes, br#"{"ruleSets": []}"#.to_vec());
        assert_eq!(source.len().await, 1);

        assert!(source.remove("a").await.is_some());
        assert!(matches!(
            source.fetch("a").await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_replace_is_visible_to_next_fetch() {
        let source = MemoryConfigSource::new();
        source.insert("a", "v1").await;
        source.insert("a", "v2").await;
        assert_eq!(source.fetch("a").await.unwrap().bytes, b"v2".to_vec());
    }

    #[tokio::test]
    async fn test_exists() {
        let source = MemoryConfigSource::new();
        source.insert("present", "{}").await;
        assert!(source.exists("present").await.unwrap());
        assert!(!source.exists("absent").await.unwrap());
    }
}
