//! Module and capability-interface registries for the Plasma host.
//!
//! Provides the core abstractions for extending Plasma with modules:
//!
//! - [`Interface`]: a named capability object other components look up at runtime
//! - [`InterfaceRegistry`]: owning, name-keyed store of registered interfaces
//! - [`Module`]: trait for a loadable unit that offers interfaces
//! - [`ModuleRegistry`]: loads/unloads modules in caller-defined order and
//!   owns the interface registry they register into
//!
//! # Lifecycle
//!
//! A module is *unloaded → loading (`initialize` running) → loaded →
//! unloading (`uninitialize` running) → dropped*. The registry only inserts a
//! module after its `initialize` succeeded, and rolls back any interface the
//! module registered if `initialize` fails. On unload, interfaces the module
//! forgot to unregister are removed before the module is dropped. Ownership
//! follows the registration ([`RegistrationId`]), so a name that someone else
//! registered again in the meantime is left alone.
//!
//! # Threading
//!
//! Registries are plain owned values without interior locking. Callers that
//! share one across threads wrap it in their own mutex.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod error;
pub mod interface;
pub mod module;
pub mod registry;

pub use error::{InterfaceError, InterfaceResult, ModuleError, ModuleResult};
pub use interface::{AsAny, Interface, InterfaceRegistry, RegistrationId};
pub use module::Module;
pub use registry::ModuleRegistry;
