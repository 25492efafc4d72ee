//! Data models for the repository layer

use chrono::{DateTime, Utc};

/// Raw configuration returned by a [`ConfigSource`](crate::ConfigSource)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedConfig {
    /// Identifier the configuration was fetched for
    pub id: String,

    /// Raw configuration bytes (JSON)
    pub bytes: Vec<u8>,

    /// When the fetch completed
    pub fetched_at: DateTime<Utc>,
}

impl FetchedConfig {
    /// Wrap bytes fetched just now
    pub fn new(id: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            bytes,
            fetched_at: Utc::now(),
        }
    }

    /// Size of the configuration in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
