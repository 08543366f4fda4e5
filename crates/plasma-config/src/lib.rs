#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Configuration for the Plasma host.
//!
//! A single [`PlasmaConfig`] value, persisted as TOML (default location
//! `./configs/plasma.toml`).
//!
//! # Usage
//!
//! ```rust,no_run
//! use plasma_config::PlasmaConfig;
//!
//! let resolved = PlasmaConfig::load(plasma_config::DEFAULT_CONFIG_PATH).unwrap();
//! println!("world: {}", resolved.config.world.name);
//! ```
//!
//! # Loading rules
//!
//! - A missing file is created from the defaults.
//! - Any key missing from an existing file falls back to its default.
//! - The merged result is written back, so the file always lists every key.

/// Configuration error types.
pub mod error;
/// Configuration file loading and saving.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{DEFAULT_CONFIG_PATH, ResolvedConfig};
pub use types::*;
