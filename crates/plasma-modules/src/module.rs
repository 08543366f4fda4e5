//! Module trait.

use crate::error::ModuleResult;
use crate::interface::InterfaceRegistry;

/// A loadable unit that can offer capability interfaces.
///
/// Modules are constructed by the caller and handed to a
/// [`ModuleRegistry`](crate::ModuleRegistry), which owns them until they are
/// unloaded.
///
/// `initialize` should be all-or-nothing from the module's point of view.
/// The registry still rolls back every interface registered during a failed
/// `initialize`, so a module that errors half-way never leaks registrations.
pub trait Module: Send {
    /// The unique, stable name of this module.
    fn name(&self) -> &str;

    /// Bring the module up. Register offered interfaces here and look up
    /// interfaces of modules loaded earlier.
    ///
    /// # Errors
    ///
    /// Any error aborts the load; the module is dropped without being
    /// inserted into the registry.
    fn initialize(&mut self, interfaces: &mut InterfaceRegistry) -> ModuleResult<()>;

    /// Tear the module down, unregistering every interface `initialize`
    /// registered.
    ///
    /// # Errors
    ///
    /// Errors are reported to the caller of `unload`, but the module is
    /// removed and dropped regardless.
    fn uninitialize(&mut self, interfaces: &mut InterfaceRegistry) -> ModuleResult<()>;
}

impl std::fmt::Debug for dyn Module + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}
