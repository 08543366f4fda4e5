//! Crash reporter module.
//!
//! Installs a panic hook that logs the panic and writes a plain-text report
//! into a dump directory. The previously installed hook still runs
//! afterwards.
//!
//! The process has a single panic hook and hooks installed later wrap this
//! one, so `uninitialize` never removes it. It switches the reporter off
//! instead, leaving a hook that only forwards to the previous one.

use std::fmt::Write as _;
use std::panic::{self, PanicHookInfo};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use plasma_modules::{InterfaceRegistry, Module, ModuleResult};
use tracing::{debug, error};

use crate::VERSION;

/// Serializes `take_hook`/`set_hook` pairs so concurrent reporters do not
/// drop each other's hook.
static HOOK_INSTALL: Mutex<()> = Mutex::new(());

/// Module that reports panics to a dump directory.
#[derive(Debug)]
pub struct CrashReporter {
    dump_dir: PathBuf,
    /// Set while initialized; shared with the installed hook.
    active: Option<Arc<AtomicBool>>,
}

impl CrashReporter {
    /// The module name.
    pub const NAME: &'static str = "plasma.crash_reporter";

    /// Create a reporter writing into `dump_dir`. The directory is created
    /// on `initialize`.
    #[must_use]
    pub fn new(dump_dir: impl Into<PathBuf>) -> Self {
        Self {
            dump_dir: dump_dir.into(),
            active: None,
        }
    }

    /// Where crash reports are written.
    #[must_use]
    pub fn dump_dir(&self) -> &Path {
        &self.dump_dir
    }
}

impl Module for CrashReporter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn initialize(&mut self, _interfaces: &mut InterfaceRegistry) -> ModuleResult<()> {
        std::fs::create_dir_all(&self.dump_dir)?;

        let dump_dir = self.dump_dir.clone();
        let active = Arc::new(AtomicBool::new(true));
        let enabled = Arc::clone(&active);

        let _guard = HOOK_INSTALL.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if enabled.load(Ordering::Acquire) {
                report_panic(&dump_dir, info);
            }
            previous(info);
        }));
        self.active = Some(active);
        debug!(dump_dir = %self.dump_dir.display(), "Panic hook installed");
        Ok(())
    }

    fn uninitialize(&mut self, _interfaces: &mut InterfaceRegistry) -> ModuleResult<()> {
        if let Some(active) = self.active.take() {
            active.store(false, Ordering::Release);
            debug!("Crash reporting disabled");
        }
        Ok(())
    }
}

/// Log the panic and write its report into `dump_dir`.
fn report_panic(dump_dir: &Path, info: &PanicHookInfo<'_>) {
    let message = panic_message(info);
    let location = info
        .location()
        .map_or_else(|| "<unknown>".to_owned(), ToString::to_string);
    error!(panic.message = %message, panic.location = %location, "Host panicked");

    match write_report(dump_dir, Utc::now(), &message, &location) {
        Ok(path) => error!(report = %path.display(), "Crash report written"),
        Err(e) => error!(error = %e, "Failed to write crash report"),
    }
}

/// Extract the panic payload as text.
fn panic_message(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_owned()
    }
}

/// Render the body of a crash report.
fn render_report(at: DateTime<Utc>, message: &str, location: &str) -> String {
    let thread = std::thread::current();
    let mut report = String::new();
    let _ = writeln!(report, "Plasma {VERSION} crash report");
    let _ = writeln!(report, "time: {}", at.to_rfc3339());
    let _ = writeln!(report, "thread: {}", thread.name().unwrap_or("<unnamed>"));
    let _ = writeln!(report, "location: {location}");
    let _ = writeln!(report, "message: {message}");
    report
}

/// Write `crash-<timestamp>.txt` into `dump_dir` and return its path.
fn write_report(
    dump_dir: &Path,
    at: DateTime<Utc>,
    message: &str,
    location: &str,
) -> std::io::Result<PathBuf> {
    let file_name = format!("crash-{}.txt", at.format("%Y%m%d-%H%M%S%.3f"));
    let path = dump_dir.join(file_name);
    std::fs::write(&path, render_report(at, message, location))?;
    Ok(path)
}
