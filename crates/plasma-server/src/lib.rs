//! Plasma Server - the host process built on the plugin and module
//! registries.
//!
//! - [`Host`]: takes the directory lock, loads the built-in plugin and
//!   modules, and tears everything down in reverse
//! - [`PlasmaServer`]: the `plasma` plugin that prepares world storage
//! - [`CrashReporter`]: module that writes a report file when the process
//!   panics
//! - [`config_bridge`]: maps [`plasma_config::PlasmaConfig`] onto telemetry
//!   settings

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config_bridge;
pub mod crash;
pub mod error;
pub mod host;
pub mod plugin;

pub use crash::CrashReporter;
pub use error::{HostError, HostResult};
pub use host::{Host, HostOptions};
pub use plugin::PlasmaServer;

/// Version of the Plasma host.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
