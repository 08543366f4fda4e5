//! Plugin error types.

use std::path::PathBuf;

/// Errors from plugin operations.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// A plugin with this name is already loaded.
    #[error("plugin already loaded: {0}")]
    AlreadyLoaded(String),

    /// The requested plugin is not loaded.
    #[error("plugin not found: {0}")]
    NotFound(String),

    /// The plugin reported an empty name.
    #[error("plugin name must not be empty")]
    EmptyName,

    /// The plugin's `initialize` failed; it was not loaded.
    #[error("plugin {plugin} failed to initialize: {source}")]
    InitializationFailed {
        /// The plugin that failed.
        plugin: String,
        /// What went wrong inside `initialize`.
        #[source]
        source: Box<PluginError>,
    },

    /// The plugin's `uninitialize` failed; it was unloaded regardless.
    #[error("plugin {plugin} failed to uninitialize: {source}")]
    UninitializationFailed {
        /// The plugin that failed.
        plugin: String,
        /// What went wrong inside `uninitialize`.
        #[source]
        source: Box<PluginError>,
    },

    /// A directory or file the plugin needs could not be prepared.
    #[error("cannot prepare {path}: {source}")]
    Storage {
        /// The path the plugin tried to use.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Plugin-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;
