//! File system based configuration source

use async_trait::async_trait;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::{ConfigSource, FetchedConfig, RepositoryError, RepositoryResult};

/// File system based configuration source
///
/// Each identifier maps to `<root>/<id>.<extension>` (`json` by default).
pub struct FileSystemConfigSource {
    /// Root directory holding configuration files
    root_path: PathBuf,
    /// File extension appended to identifiers
    extension: String,
}

impl FileSystemConfigSource {
    /// Create a new file system source
    ///
    /// # Arguments
    /// * `root_path` - The directory containing configuration files
    ///
    /// # Example
    /// ```no_run
    /// use rulesengine_repository::FileSystemConfigSource;
    ///
    /// let source = FileSystemConfigSource::new("configs").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(root_path: P) -> RepositoryResult<Self> {
        let path = root_path.as_ref();

        if !path.is_dir() {
            return Err(RepositoryError::InvalidPath {
                path: path.to_path_buf(),
            });
        }

        let abs_path = path
            .absolutize()
            .map_err(|e| RepositoryError::Other(format!("Failed to absolutize path: {}", e)))?
            .to_path_buf();

        Ok(Self {
            root_path: abs_path,
            extension: "json".to_string(),
        })
    }

    /// Use a different file extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Root directory of this source
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Resolve the file backing `id`
    ///
    /// Identifiers must be plain file stems; separators and parent references
    /// are rejected so lookups cannot escape the root directory.
    fn resolve_path(&self, id: &str) -> RepositoryResult<PathBuf> {
        let invalid = id.is_empty()
            || id == "."
            || id == ".."
            || id.contains('/')
            || id.contains('\\')
            || id.contains('\0');

        if invalid {
            return Err(RepositoryError::InvalidId { id: id.to_string() });
        }

        Ok(self.root_path.join(format!("{}.{}", id, self.extension)))
    }
}

#[async_trait]
impl ConfigSource for FileSystemConfigSource {
    async fn fetch(&self, id: &str) -> RepositoryResult<FetchedConfig> {
        let path = self.resolve_path(id)?;

        match fs::read(&path).await {
            Ok(bytes) => {
                tracing::debug!(id, path = %path.display(), bytes = bytes.len(), "fetched configuration");
                Ok(FetchedConfig::new(id, bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RepositoryError::NotFound { id: id.to_string() })
            }
            Err(e) => Err(RepositoryError::Io(e)),
        }
    }
}
