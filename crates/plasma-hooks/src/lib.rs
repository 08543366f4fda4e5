//! Plasma Hooks - named extension points for the Plasma host.
//!
//! The [`HookManager`] module registers a [`HookInterface`] under
//! [`HookInterface::NAME`]. Other components look it up through the
//! interface registry, attach handlers to named events, and dispatch
//! events with a JSON payload.
//!
//! # Example
//!
//! ```rust
//! use plasma_hooks::{HookInterface, HookManager, events};
//! use plasma_modules::ModuleRegistry;
//!
//! let mut modules = ModuleRegistry::new();
//! modules.load(Box::new(HookManager::new())).unwrap();
//!
//! let hooks = modules
//!     .interfaces()
//!     .get_as::<HookInterface>(HookInterface::NAME)
//!     .unwrap();
//! hooks.register(events::SERVER_STARTED, |payload| {
//!     println!("started: {payload}");
//! });
//! assert_eq!(hooks.dispatch(events::SERVER_STARTED, &serde_json::json!({})), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod hook;
pub mod interface;
pub mod manager;

pub use hook::{HookHandler, events};
pub use interface::HookInterface;
pub use manager::HookManager;
