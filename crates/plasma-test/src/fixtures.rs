//! Journals, temporary worlds and logging for tests.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use plasma_config::PlasmaConfig;
use tempfile::TempDir;

/// Shared, append-only record of lifecycle calls.
///
/// Clones append to the same record.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    /// Create an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.into());
    }

    /// Snapshot of every entry so far.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|g| g.clone())
            .unwrap_or_default()
    }

    /// Forget every entry.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.clear();
        }
    }
}

/// A configuration whose world storage lives under `dir`.
#[must_use]
pub fn test_config(dir: &Path) -> PlasmaConfig {
    let mut config = PlasmaConfig::default();
    config.logging.color_enabled = false;
    config.world.name = "test-world".to_owned();
    config.world.storage.base_dir = dir.join("world");
    config.world.storage.backup_dir = dir.join("world").join("backups");
    config
}

/// A fresh temporary directory plus a configuration rooted in it.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
pub fn test_world() -> (TempDir, PlasmaConfig) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let config = test_config(dir.path());
    (dir, config)
}

/// Route `tracing` output through the test harness. Safe to call from every
/// test; only the first call installs a subscriber.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
