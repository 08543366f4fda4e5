//! Plugin trait.

use std::fmt;

use crate::error::PluginResult;
use crate::registry::PluginRegistry;

/// A top-level loadable unit of the host.
///
/// Implementors are constructed by the caller and handed to a
/// [`PluginRegistry`], which owns them until they are unloaded.
pub trait Plugin: Send {
    /// The unique, stable name of this plugin.
    fn name(&self) -> &str;

    /// The plugin's version string.
    fn version(&self) -> &str;

    /// Bring the plugin up.
    ///
    /// Runs before the plugin is inserted into the registry, so the plugin
    /// can inspect plugins loaded before it but never sees itself.
    ///
    /// # Errors
    ///
    /// Any error aborts the load and the plugin is dropped.
    fn initialize(&mut self, registry: &mut PluginRegistry) -> PluginResult<()>;

    /// Tear the plugin down. Runs after the plugin has been removed from the
    /// registry and before it is dropped.
    ///
    /// # Errors
    ///
    /// Errors are reported to the caller of `unload`; the plugin is dropped
    /// regardless.
    fn uninitialize(&mut self, _registry: &mut PluginRegistry) -> PluginResult<()> {
        Ok(())
    }
}

impl fmt::Debug for dyn Plugin + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name())
            .field("version", &self.version())
            .finish_non_exhaustive()
    }
}
