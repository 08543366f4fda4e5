//! Plugin registry.
//!
//! Stores loaded plugins keyed by name, remembers load order, and unloads
//! in reverse.

use std::collections::HashMap;

use tracing::{debug, info, trace, warn};

use crate::error::{PluginError, PluginResult};
use crate::plugin::Plugin;

/// Registry of loaded plugins.
pub struct PluginRegistry {
    plugins: HashMap<String, Box<dyn Plugin>>,
    /// Plugin names in load order.
    order: Vec<String>,
}

impl PluginRegistry {
    /// Create an empty plugin registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Load a plugin unless one with the same name is already loaded.
    ///
    /// Returns `Ok(true)` when the plugin was initialized and inserted, and
    /// `Ok(false)` on a name collision. A colliding plugin is dropped
    /// without being initialized and the registry is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::EmptyName`] for a nameless plugin, or
    /// [`PluginError::InitializationFailed`] wrapping the plugin's own
    /// error.
    pub fn try_load(&mut self, mut plugin: Box<dyn Plugin>) -> PluginResult<bool> {
        let name = plugin.name().to_owned();
        trace!(plugin = %name, version = %plugin.version(), "Loading plugin");
        if name.is_empty() {
            return Err(PluginError::EmptyName);
        }
        if self.plugins.contains_key(&name) {
            debug!(plugin = %name, "Plugin already loaded");
            return Ok(false);
        }

        plugin
            .initialize(self)
            .map_err(|e| PluginError::InitializationFailed {
                plugin: name.clone(),
                source: Box::new(e),
            })?;

        // `initialize` may have loaded further plugins; one of them could
        // have claimed this name in the meantime.
        if self.plugins.contains_key(&name) {
            warn!(plugin = %name, "Plugin name claimed during its own initialize");
            if let Err(e) = plugin.uninitialize(self) {
                warn!(plugin = %name, error = %e, "Plugin uninitialize error after name collision");
            }
            return Ok(false);
        }

        info!(plugin = %name, version = %plugin.version(), "Loaded plugin");
        self.order.push(name.clone());
        self.plugins.insert(name, plugin);
        Ok(true)
    }

    /// Load a plugin, treating a name collision as an error.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::AlreadyLoaded`] on a name collision, plus
    /// everything [`try_load`](Self::try_load) can return.
    pub fn load(&mut self, plugin: Box<dyn Plugin>) -> PluginResult<()> {
        let name = plugin.name().to_owned();
        if self.try_load(plugin)? {
            Ok(())
        } else {
            Err(PluginError::AlreadyLoaded(name))
        }
    }

    /// Unload a plugin by name.
    ///
    /// The plugin is removed from the registry, its `uninitialize` hook
    /// runs, then it is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotFound`] if no plugin with that name is
    /// loaded, or [`PluginError::UninitializationFailed`] if the hook
    /// failed. In the latter case the plugin is still unloaded.
    pub fn unload(&mut self, name: &str) -> PluginResult<()> {
        let mut plugin = self
            .plugins
            .remove(name)
            .ok_or_else(|| PluginError::NotFound(name.to_owned()))?;
        self.order.retain(|n| n != name);

        trace!(plugin = %name, "Unloading plugin");
        let result = plugin.uninitialize(self);
        drop(plugin);

        match result {
            Ok(()) => {
                info!(plugin = %name, "Unloaded plugin");
                Ok(())
            },
            Err(e) => Err(PluginError::UninitializationFailed {
                plugin: name.to_owned(),
                source: Box::new(e),
            }),
        }
    }

    /// Unload every plugin in reverse load order.
    ///
    /// Errors are logged without short-circuiting.
    pub fn unload_all(&mut self) {
        while let Some(name) = self.order.pop() {
            if let Err(e) = self.unload(&name) {
                warn!(plugin = %name, error = %e, "Plugin unload error during unload_all");
            }
        }
        debug!("All plugins unloaded");
    }

    /// Get a loaded plugin by name.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotFound`] if no plugin with that name is loaded.
    pub fn get(&self, name: &str) -> PluginResult<&dyn Plugin> {
        self.plugins
            .get(name)
            .map(AsRef::as_ref)
            .ok_or_else(|| PluginError::NotFound(name.to_owned()))
    }

    /// Get a mutable reference to a loaded plugin by name.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotFound`] if no plugin with that name is loaded.
    pub fn get_mut(&mut self, name: &str) -> PluginResult<&mut Box<dyn Plugin>> {
        self.plugins
            .get_mut(name)
            .ok_or_else(|| PluginError::NotFound(name.to_owned()))
    }

    /// Whether a plugin with this name is loaded.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Loaded plugin names in load order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Number of loaded plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PluginRegistry {
    fn drop(&mut self) {
        if !self.order.is_empty() {
            self.unload_all();
        }
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.order)
            .finish()
    }
}
