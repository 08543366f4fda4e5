//! Directory lock error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while acquiring or checking a [`DirectoryLock`].
///
/// [`DirectoryLock`]: crate::DirectoryLock
#[derive(Debug, Error)]
pub enum LockError {
    /// Another holder (usually another host process) owns the lock.
    #[error("directory is locked by another instance: {path}")]
    LockHeld {
        /// The locked directory.
        path: PathBuf,
    },

    /// The directory or its sentinel file could not be used.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file or directory the operation targeted.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl LockError {
    /// Whether this error means the directory is held by someone else.
    #[must_use]
    pub fn is_lock_held(&self) -> bool {
        matches!(self, Self::LockHeld { .. })
    }
}

/// Result type for directory lock operations.
pub type LockResult<T> = Result<T, LockError>;
