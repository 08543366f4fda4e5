//! Plasma Core - Foundation primitives for the Plasma host process.
//!
//! This crate provides:
//! - [`DirectoryLock`]: an exclusive, cross-process lock scoped to a data
//!   directory, guaranteeing a single running host per directory
//! - [`LockError`]: distinguishes "held by another instance" from plain I/O
//!   failures
//!
//! # Example
//!
//! ```rust,no_run
//! use plasma_core::{DirectoryLock, LockError};
//!
//! match DirectoryLock::acquire("./world") {
//!     Ok(lock) => println!("locked {}", lock.path().display()),
//!     Err(LockError::LockHeld { .. }) => eprintln!("another instance is already running"),
//!     Err(e) => eprintln!("data directory unusable: {e}"),
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod error;
pub mod lock;

pub use error::{LockError, LockResult};
pub use lock::DirectoryLock;
