//! The `plasma` server plugin.

use std::path::Path;

use plasma_config::WorldSection;
use plasma_plugins::{Plugin, PluginError, PluginRegistry, PluginResult};
use tracing::{debug, info};

use crate::VERSION;

/// The host's primary plugin.
///
/// Owns the world settings and makes sure the world's storage and backup
/// directories exist before anything else runs.
#[derive(Debug, Clone)]
pub struct PlasmaServer {
    world: WorldSection,
}

impl PlasmaServer {
    /// The plugin name.
    pub const NAME: &'static str = "plasma";

    /// Create the plugin for `world`.
    #[must_use]
    pub fn new(world: WorldSection) -> Self {
        Self { world }
    }

    /// The world this plugin serves.
    #[must_use]
    pub fn world(&self) -> &WorldSection {
        &self.world
    }
}

fn ensure_dir(path: &Path) -> PluginResult<()> {
    std::fs::create_dir_all(path).map_err(|source| PluginError::Storage {
        path: path.to_path_buf(),
        source,
    })
}

impl Plugin for PlasmaServer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        VERSION
    }

    fn initialize(&mut self, _registry: &mut PluginRegistry) -> PluginResult<()> {
        let storage = &self.world.storage;
        ensure_dir(&storage.base_dir)?;
        ensure_dir(&storage.backup_dir)?;
        debug!(
            base_dir = %storage.base_dir.display(),
            backup_dir = %storage.backup_dir.display(),
            "World storage ready"
        );
        info!(world = %self.world.name, "Serving world");
        Ok(())
    }

    fn uninitialize(&mut self, _registry: &mut PluginRegistry) -> PluginResult<()> {
        info!(world = %self.world.name, "Closing world");
        Ok(())
    }
}
