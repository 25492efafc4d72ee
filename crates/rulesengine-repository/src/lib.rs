//! Configuration sources for the rules engine
//!
//! This crate provides the [`ConfigSource`] abstraction the cache uses to fetch
//! raw configuration for an identifier, together with two implementations:
//!
//! - **File System**: `<root>/<id>.json` files on disk
//! - **Memory**: a mutable in-process map, for embedding and tests
//!
//! Sources return raw bytes; parsing and fingerprinting happen downstream so
//! the same bytes always produce the same compiled trees.

pub mod error;
pub mod file_system;
pub mod memory;
pub mod models;
pub mod traits;

// Re-exports - Error
pub use error::{RepositoryError, RepositoryResult};

// Re-exports - Sources
pub use file_system::FileSystemConfigSource;
pub use memory::MemoryConfigSource;
pub use models::FetchedConfig;
pub use traits::ConfigSource;
