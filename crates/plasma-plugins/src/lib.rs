//! Plugin trait and registry for the Plasma host.
//!
//! Plugins are the host's primary extension point: top-level units with a
//! name and a version, loaded in a fixed order at startup.
//!
//! - [`Plugin`]: trait for plugin lifecycle (initialize/uninitialize)
//! - [`PluginRegistry`]: owns loaded plugins, rejects duplicate names
//!
//! Loading checks for a name collision before the plugin is initialized, so
//! [`PluginRegistry::try_load`] can report "already loaded" as a plain
//! `false` instead of an error.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod error;
pub mod plugin;
pub mod registry;

pub use error::{PluginError, PluginResult};
pub use plugin::Plugin;
pub use registry::PluginRegistry;
