//! Configuration types for the Plasma host.
//!
//! Every struct implements [`Default`] with the production defaults and is
//! `#[serde(default)]`, so a partial file deserializes into a complete
//! configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration for the Plasma host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlasmaConfig {
    /// Console logging.
    pub logging: LoggingSection,
    /// World identity and storage locations.
    pub world: WorldSection,
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Whether console output uses ANSI colours.
    pub color_enabled: bool,
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"` or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["plasma_modules=trace"]`).
    pub directives: Vec<String>,
    /// Rolling-file output. When enabled it replaces console output.
    pub file: FileLoggingSection,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            color_enabled: true,
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
            file: FileLoggingSection::default(),
        }
    }
}

/// Rolling log file settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingSection {
    /// Write logs to files instead of the console.
    pub enabled: bool,
    /// Directory the log files are created in.
    pub directory: PathBuf,
    /// File name prefix; the appender adds the date suffix.
    pub prefix: String,
    /// Rotation: `"daily"`, `"hourly"` or `"never"`.
    pub rotation: String,
}

impl Default for FileLoggingSection {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: PathBuf::from("./logs"),
            prefix: "plasma".to_owned(),
            rotation: "daily".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// WorldSection
// ---------------------------------------------------------------------------

/// World configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSection {
    /// Display name of the world.
    pub name: String,
    /// Where world data lives on disk.
    pub storage: StorageSection,
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            name: "world".to_owned(),
            storage: StorageSection::default(),
        }
    }
}

/// World storage locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Data directory. The host holds a directory lock on it while running.
    pub base_dir: PathBuf,
    /// Directory for world backups.
    pub backup_dir: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            backup_dir: PathBuf::from("./backups"),
        }
    }
}
