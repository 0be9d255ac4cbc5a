//! Error types for cache persistence

use std::path::PathBuf;

/// Errors while persisting the cache file
///
/// Only [`GenerationCache::save`](crate::GenerationCache::save) returns
/// these; every other operation recovers.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// IO error while writing the cache file
    #[error("io error writing {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Cache contents could not be serialized
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CacheError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = CacheError::io_error(
            "/ro/.ai-cache.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        );
        assert_eq!(err.to_string(), "io error writing /ro/.ai-cache.json: read-only");
    }
}
