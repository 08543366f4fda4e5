//! Config file loading and saving.
//!
//! Implements the `PlasmaConfig::load()` algorithm:
//! 1. Read the file; if it does not exist, start from the defaults
//! 2. Deserialize, letting every missing key fall back to its default
//! 3. Validate
//! 4. Write the merged configuration back to disk
//! 5. Return `ResolvedConfig`

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::types::PlasmaConfig;
use crate::validate;

/// Default location of the configuration file, relative to the working
/// directory.
pub const DEFAULT_CONFIG_PATH: &str = "./configs/plasma.toml";

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: usize = 1_048_576;

/// A loaded configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The merged configuration.
    pub config: PlasmaConfig,
    /// The file it was loaded from (and saved back to).
    pub path: PathBuf,
    /// `true` if the file did not exist and was created from defaults.
    pub created: bool,
}

impl PlasmaConfig {
    /// Load the configuration at `path`, creating it from defaults if it is
    /// missing and re-saving the merged result.
    ///
    /// See [`loader::load`](crate::loader::load).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed,
    /// validated or written back.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<ResolvedConfig> {
        load(path.as_ref())
    }

    /// Write this configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if serialization or the write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        save(self, path.as_ref())
    }

    /// Parse a configuration from TOML text, filling missing keys with
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] on malformed input.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        parse("<string>", content)
    }

    /// Render this configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SerializeError`] if serialization fails.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Load the configuration file at `path`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, validated
/// or written back.
pub fn load(path: &Path) -> ConfigResult<ResolvedConfig> {
    let (config, created) = match try_read_file(path)? {
        Some(content) => (parse(&path.display().to_string(), &content)?, false),
        None => {
            debug!(path = %path.display(), "config file not found, using defaults");
            (PlasmaConfig::default(), true)
        },
    };

    validate::validate(&config)?;

    // Re-save so keys that fell back to defaults show up in the file.
    save(&config, path)?;
    debug!(path = %path.display(), created, "configuration loaded");

    Ok(ResolvedConfig {
        config,
        path: path.to_path_buf(),
        created,
    })
}

/// Write `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns a [`ConfigError`] if serialization or the write fails.
pub fn save(config: &PlasmaConfig, path: &Path) -> ConfigResult<()> {
    let content = config.to_toml_string()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Read a file, returning `None` if it does not exist.
///
/// Uses a single read to avoid a separate exists check racing the read.
fn try_read_file(path: &Path) -> ConfigResult<Option<String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    if content.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit",
                content.len(),
            ),
        });
    }

    Ok(Some(content))
}

fn parse(origin: &str, content: &str) -> ConfigResult<PlasmaConfig> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: origin.to_owned(),
        source: e,
    })
}
