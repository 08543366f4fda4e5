use thiserror::Error;

/// Errors from loading, saving or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file (or its directory) could not be written.
    #[error("failed to write config file {path}: {source}")]
    WriteError {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path of the file.
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("invalid value for {field}: {message}")]
    ValidationError {
        /// Dotted key path of the offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
