//! Cache error types

use std::time::Duration;

use rulesengine_core::RulesError;
use rulesengine_repository::RepositoryError;
use thiserror::Error;

/// Cache error
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration source failed
    #[error("Failed to fetch configuration for '{id}': {source}")]
    Fetch {
        id: String,
        #[source]
        source: RepositoryError,
    },

    /// Configuration source did not answer in time
    #[error("Timed out after {timeout:?} fetching configuration for '{id}'")]
    FetchTimeout { id: String, timeout: Duration },

    /// Building or validating the trees failed
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// Invalid cache configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CacheError {
    /// Whether the configuration could not be fetched (including timeouts)
    pub fn is_fetch(&self) -> bool {
        matches!(self, CacheError::Fetch { .. } | CacheError::FetchTimeout { .. })
    }

    /// Whether the trees could not be built from the configuration
    pub fn is_build(&self) -> bool {
        matches!(self, CacheError::Rules(e) if e.is_build())
    }

    /// Whether a built tree failed validation
    pub fn is_validation(&self) -> bool {
        matches!(self, CacheError::Rules(e) if e.is_validation())
    }

    /// Short label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            CacheError::Fetch { .. } => "fetch",
            CacheError::FetchTimeout { .. } => "fetch_timeout",
            CacheError::Rules(RulesError::Validation(_)) => "validation",
            CacheError::Rules(_) => "build",
            CacheError::Config(_) => "config",
        }
    }
}

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let fetch = CacheError::Fetch {
            id: "a".to_string(),
            source: RepositoryError::NotFound { id: "a".to_string() },
        };
        assert!(fetch.is_fetch());
        assert_eq!(fetch.kind(), "fetch");
        assert!(fetch.to_string().contains("Configuration not found: a"));

        let timeout = CacheError::FetchTimeout {
            id: "a".to_string(),
            timeout: Duration::from_secs(2),
        };
        assert!(timeout.is_fetch());
        assert_eq!(timeout.kind(), "fetch_timeout");

        let validation: CacheError = RulesError::Validation("uneven".to_string()).into();
        assert!(validation.is_validation());
        assert!(!validation.is_build());
        assert_eq!(validation.kind(), "validation");

        let build: CacheError = RulesError::Build("bad".to_string()).into();
        assert!(build.is_build());
        assert_eq!(build.kind(), "build");
        assert_eq!(build.to_string(), "Build error: bad");
    }
}
