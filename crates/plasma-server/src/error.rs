//! Host error types.

use plasma_core::LockError;
use plasma_modules::ModuleError;
use plasma_plugins::PluginError;
use thiserror::Error;

/// Errors from starting or stopping the host.
#[derive(Debug, Error)]
pub enum HostError {
    /// The data directory could not be locked.
    #[error(transparent)]
    Lock(#[from] LockError),

    /// A plugin failed to load or unload.
    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// A module failed to load or unload.
    #[error(transparent)]
    Module(#[from] ModuleError),
}

impl HostError {
    /// Whether startup failed because another instance holds the data
    /// directory.
    #[must_use]
    pub fn is_lock_held(&self) -> bool {
        matches!(self, Self::Lock(e) if e.is_lock_held())
    }
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;
