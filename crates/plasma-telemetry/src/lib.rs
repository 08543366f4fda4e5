//! Plasma Telemetry - Logging for the Plasma host.
//!
//! This crate provides:
//! - Configurable logging setup with multiple formats and targets
//! - An explicit colour switch ([`LogConfig::ansi`]) instead of any
//!   process-wide flag
//! - Integration with the tracing ecosystem
//!
//! # Example
//!
//! ```rust,no_run
//! use plasma_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), plasma_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Compact)
//!     .with_ansi(false)
//!     .with_directive("plasma_modules=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("Logging system initialized");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};
