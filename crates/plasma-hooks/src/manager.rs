//! The hook manager module.

use plasma_modules::{InterfaceRegistry, Module, ModuleResult};
use tracing::debug;

use crate::interface::HookInterface;

/// Module that offers the [`HookInterface`].
///
/// The registry owns the registered interface; the module keeps a handle
/// onto the same handler table so it can report on it after registration.
#[derive(Debug, Default)]
pub struct HookManager {
    hooks: HookInterface,
}

impl HookManager {
    /// The module name.
    pub const NAME: &'static str = "plasma.hook_manager";

    /// Create a hook manager with an empty handler table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle onto the handler table served by this module.
    #[must_use]
    pub fn hooks(&self) -> &HookInterface {
        &self.hooks
    }
}

impl Module for HookManager {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn initialize(&mut self, interfaces: &mut InterfaceRegistry) -> ModuleResult<()> {
        interfaces.register(Box::new(self.hooks.clone()))?;
        debug!(interface = HookInterface::NAME, "Hook interface registered");
        Ok(())
    }

    fn uninitialize(&mut self, interfaces: &mut InterfaceRegistry) -> ModuleResult<()> {
        interfaces.unregister(HookInterface::NAME)?;
        self.hooks.clear();
        Ok(())
    }
}
