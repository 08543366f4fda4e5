//! Module and interface error types.

/// Errors from interface registry operations.
#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    /// An interface with this name is already registered.
    #[error("interface already registered: {0}")]
    AlreadyRegistered(String),

    /// The interface reported an empty name.
    #[error("interface name must not be empty")]
    EmptyName,

    /// No interface is registered under this name.
    #[error("interface not found: {0}")]
    NotFound(String),

    /// The interface exists but is not of the requested concrete type.
    #[error("interface {name} is not a {expected}")]
    TypeMismatch {
        /// The interface name.
        name: String,
        /// The type the caller asked for.
        expected: &'static str,
    },
}

/// Result type for interface operations.
pub type InterfaceResult<T> = Result<T, InterfaceError>;

/// Errors from module operations.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// A module with this name is already loaded.
    #[error("module already loaded: {0}")]
    AlreadyLoaded(String),

    /// The module reported an empty name.
    #[error("module name must not be empty")]
    EmptyName,

    /// The requested module is not loaded.
    #[error("module not found: {0}")]
    NotFound(String),

    /// The module's `initialize` failed; it was not loaded.
    #[error("module {module} failed to initialize: {source}")]
    InitializationFailed {
        /// The module that failed.
        module: String,
        /// What went wrong inside `initialize`.
        #[source]
        source: Box<ModuleError>,
    },

    /// The module's `uninitialize` failed; it was unloaded regardless.
    #[error("module {module} failed to uninitialize: {source}")]
    UninitializationFailed {
        /// The module that failed.
        module: String,
        /// What went wrong inside `uninitialize`.
        #[source]
        source: Box<ModuleError>,
    },

    /// An interface registry operation failed.
    #[error(transparent)]
    Interface(#[from] InterfaceError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Module-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Result type for module operations.
pub type ModuleResult<T> = Result<T, ModuleError>;
