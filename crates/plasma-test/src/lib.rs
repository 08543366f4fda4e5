//! Plasma Test - shared test utilities for the Plasma host.
//!
//! Recording plugins and modules, a call journal for asserting lifecycle
//! order, and helpers for temporary world directories.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! plasma-test.workspace = true
//! ```
//!
//! ```rust
//! use plasma_modules::ModuleRegistry;
//! use plasma_test::{Journal, TestModule};
//!
//! let journal = Journal::new();
//! let mut modules = ModuleRegistry::new();
//! modules
//!     .load(Box::new(TestModule::new("A", &journal).offering("A.iface")))
//!     .unwrap();
//! assert!(modules.interfaces().get("A.iface").is_ok());
//! assert_eq!(journal.entries(), vec!["init:A"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
