//! Capability interfaces and their registry.

use std::any::Any;
use std::collections::HashMap;

use tracing::trace;

use crate::error::{InterfaceError, InterfaceResult};

/// Upcast helper so registered interfaces can be downcast to their concrete
/// type. Implemented for every `'static` type.
pub trait AsAny: Any {
    /// View `self` as [`Any`].
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A named capability that other components can look up at runtime.
///
/// The name is the interface's identity: stable, non-empty and unique
/// within one [`InterfaceRegistry`]. Names compare by content.
pub trait Interface: AsAny + Send + Sync {
    /// The unique name this interface is registered under.
    fn name(&self) -> &str;
}

impl std::fmt::Debug for dyn Interface + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interface")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// Identifies one registration of an interface.
///
/// Every successful [`InterfaceRegistry::register`] gets a fresh id, so an
/// interface that is unregistered and registered again under the same name
/// is a different registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationId(u64);

struct Registered {
    id: RegistrationId,
    interface: Box<dyn Interface>,
}

/// Owning, name-keyed store of capability interfaces.
///
/// A registered interface belongs to the registry until it is
/// unregistered; components that register one keep at most a handle to
/// shared state, never the interface object itself.
#[derive(Default)]
pub struct InterfaceRegistry {
    interfaces: HashMap<String, Registered>,
    next_id: u64,
}

impl InterfaceRegistry {
    /// Create an empty interface registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interface, taking ownership of it.
    ///
    /// # Errors
    ///
    /// Returns [`InterfaceError::EmptyName`] for a nameless interface, or
    /// [`InterfaceError::AlreadyRegistered`] if an interface with the same
    /// name exists. The rejected interface is dropped and the
    /// existing one is left in place.
    pub fn register(&mut self, interface: Box<dyn Interface>) -> InterfaceResult<()> {
        let name = interface.name().to_owned();
        trace!(interface = %name, "Registering interface");
        if name.is_empty() {
            return Err(InterfaceError::EmptyName);
        }
        if self.interfaces.contains_key(&name) {
            return Err(InterfaceError::AlreadyRegistered(name));
        }
        let id = RegistrationId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.interfaces.insert(name, Registered { id, interface });
        Ok(())
    }

    /// Unregister and drop the interface registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`InterfaceError::NotFound`] if nothing is registered under
    /// that name.
    pub fn unregister(&mut self, name: &str) -> InterfaceResult<()> {
        trace!(interface = %name, "Unregistering interface");
        self.interfaces
            .remove(name)
            .map(drop)
            .ok_or_else(|| InterfaceError::NotFound(name.to_owned()))
    }

    /// Look up an interface by name.
    ///
    /// The reference is only valid while the interface stays registered.
    ///
    /// # Errors
    ///
    /// Returns [`InterfaceError::NotFound`] if nothing is registered under
    /// that name.
    pub fn get(&self, name: &str) -> InterfaceResult<&dyn Interface> {
        self.interfaces
            .get(name)
            .map(|r| r.interface.as_ref())
            .ok_or_else(|| InterfaceError::NotFound(name.to_owned()))
    }

    /// Look up an interface by name and downcast it to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`InterfaceError::NotFound`] if nothing is registered under
    /// that name, or [`InterfaceError::TypeMismatch`] if the registered
    /// interface is not a `T`.
    pub fn get_as<T: Interface>(&self, name: &str) -> InterfaceResult<&T> {
        let interface: &dyn Interface = self.get(name)?;
        interface
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| InterfaceError::TypeMismatch {
                name: name.to_owned(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// The current registration under `name`, if any.
    #[must_use]
    pub fn registration_id(&self, name: &str) -> Option<RegistrationId> {
        self.interfaces.get(name).map(|r| r.id)
    }

    /// Every current registration, keyed by name.
    pub(crate) fn registrations(&self) -> HashMap<String, RegistrationId> {
        self.interfaces
            .iter()
            .map(|(name, r)| (name.clone(), r.id))
            .collect()
    }

    /// Unregister `name` only if it is still registration `id`.
    ///
    /// Returns whether anything was removed.
    pub(crate) fn unregister_registration(&mut self, name: &str, id: RegistrationId) -> bool {
        if self.registration_id(name) != Some(id) {
            return false;
        }
        self.interfaces.remove(name).is_some()
    }

    /// Whether an interface is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.interfaces.contains_key(name)
    }

    /// Names of all registered interfaces, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.interfaces.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered interfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    /// Whether no interfaces are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}

impl std::fmt::Debug for InterfaceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterfaceRegistry")
            .field("interfaces", &self.names())
            .finish()
    }
}
