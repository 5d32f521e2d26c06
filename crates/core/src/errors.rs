use std::path::PathBuf;

/// Result type alias for chcache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Boxed error as returned by user-supplied producers and remote backends
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for the disk cache, the node registry and storage backends
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// File system operation failed
    #[error("file system {operation} operation failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Backend has no entry for the key
    #[error("key '{key}' not found")]
    KeyNotFound { key: String },

    /// Key cannot be used as a cache file name
    #[error("invalid cache key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// The user-supplied getter failed; the cache was left untouched
    #[error("getter failed for key '{key}': {source}")]
    Getter {
        key: String,
        #[source]
        source: BoxError,
    },

    /// Fetched value could not be written to disk
    #[error("failed to persist '{path}': {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Shard directory could not be opened or listed
    #[error("shard directory '{path}' unavailable: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registry has an empty active node set
    #[error("no storage nodes available")]
    NoNodesAvailable,

    /// Node weight must be positive
    #[error("node '{node}' must have a weight greater than zero")]
    InvalidWeight { node: String },

    /// Two nodes in one set share a name
    #[error("duplicate node name '{name}'")]
    DuplicateNode { name: String },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A blocking task panicked or was cancelled
    #[error("background {operation} task failed: {message}")]
    Join {
        operation: &'static str,
        message: String,
    },
}

impl CacheError {
    /// Create a file system error with context
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            operation,
            source,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        CacheError::Configuration {
            message: message.into(),
        }
    }

    /// Create a key-not-found error
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        CacheError::KeyNotFound { key: key.into() }
    }

    /// Whether this error means the key is absent rather than a failure
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            CacheError::KeyNotFound { .. } => true,
            CacheError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
