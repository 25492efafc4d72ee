//! Error types for configuration sources

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur while fetching configuration
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No configuration stored for the identifier
    #[error("Configuration not found: {id}")]
    NotFound { id: String },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid path provided
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Identifier cannot be mapped to a storage location
    #[error("Invalid identifier: {id}")]
    InvalidId { id: String },

    /// Generic error
    #[error("Repository error: {0}")]
    Other(String),
}
