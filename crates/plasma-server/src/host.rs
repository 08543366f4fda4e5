//! Host bootstrap.
//!
//! Startup order: lock the data directory, build the registries, load the
//! `plasma` plugin, then the crash reporter and hook manager modules.
//! Shutdown runs the same steps backwards.

use std::path::{Path, PathBuf};

use plasma_config::PlasmaConfig;
use plasma_core::DirectoryLock;
use plasma_hooks::{HookInterface, HookManager, events};
use plasma_modules::ModuleRegistry;
use plasma_plugins::PluginRegistry;
use serde_json::json;
use tracing::{info, warn};

use crate::crash::CrashReporter;
use crate::error::{HostError, HostResult};
use crate::plugin::PlasmaServer;

/// Directory under the data directory that receives crash reports unless
/// overridden.
const CRASH_DIR_NAME: &str = "crash-reports";

/// Options for [`Host::start`].
#[derive(Debug, Clone)]
pub struct HostOptions {
    /// The resolved configuration.
    pub config: PlasmaConfig,
    /// Where crash reports go. Defaults to `<base_dir>/crash-reports`.
    pub crash_dump_dir: Option<PathBuf>,
}

impl HostOptions {
    /// Options for `config` with default paths.
    #[must_use]
    pub fn new(config: PlasmaConfig) -> Self {
        Self {
            config,
            crash_dump_dir: None,
        }
    }

    /// Write crash reports to `dir`.
    #[must_use]
    pub fn with_crash_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.crash_dump_dir = Some(dir.into());
        self
    }

    fn resolved_crash_dir(&self) -> PathBuf {
        self.crash_dump_dir
            .clone()
            .unwrap_or_else(|| self.config.world.storage.base_dir.join(CRASH_DIR_NAME))
    }
}

/// A running host.
///
/// Dropping a host shuts it down; call [`shutdown`](Self::shutdown) to see
/// teardown errors.
#[derive(Debug)]
pub struct Host {
    // Field order is drop order: components go before the lock.
    modules: ModuleRegistry,
    plugins: PluginRegistry,
    lock: Option<DirectoryLock>,
    config: PlasmaConfig,
}

impl Host {
    /// Start the host.
    ///
    /// On error everything acquired so far is released again, including the
    /// directory lock.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Lock`](crate::HostError::Lock) if the data
    /// directory is held by another instance or unusable, or a plugin or
    /// module error if a built-in component fails to load.
    pub fn start(options: HostOptions) -> HostResult<Self> {
        let base_dir = &options.config.world.storage.base_dir;
        let lock = DirectoryLock::acquire(base_dir)?;
        info!(path = %lock.path().display(), "Data directory locked");

        let mut plugins = PluginRegistry::new();
        plugins.load(Box::new(PlasmaServer::new(options.config.world.clone())))?;

        let mut modules = ModuleRegistry::new();
        modules.load(Box::new(CrashReporter::new(options.resolved_crash_dir())))?;
        modules.load(Box::new(HookManager::new()))?;

        let host = Self {
            modules,
            plugins,
            lock: Some(lock),
            config: options.config,
        };
        host.dispatch(
            events::SERVER_STARTED,
            &json!({
                "world": host.config.world.name,
                "plugins": host.plugins.names(),
                "modules": host.modules.names(),
            }),
        );
        info!(
            world = %host.config.world.name,
            plugins = host.plugins.len(),
            modules = host.modules.len(),
            "Host started"
        );
        Ok(host)
    }

    /// Stop the host: unload modules, then plugins, then release the lock.
    ///
    /// Calling this more than once is a no-op.
    ///
    /// # Errors
    ///
    /// Teardown continues past failures; the first plugin or module error is
    /// returned once everything has been released.
    pub fn shutdown(&mut self) -> HostResult<()> {
        let Some(lock) = self.lock.take() else {
            return Ok(());
        };
        info!("Host shutting down");
        self.dispatch(
            events::SERVER_STOPPING,
            &json!({ "world": self.config.world.name }),
        );

        let mut first_error: Option<HostError> = None;
        let modules: Vec<String> = self
            .modules
            .names()
            .into_iter()
            .rev()
            .map(str::to_owned)
            .collect();
        for name in modules {
            if let Err(e) = self.modules.unload(&name) {
                warn!(module = %name, error = %e, "Module unload failed");
                first_error.get_or_insert(e.into());
            }
        }
        let plugins: Vec<String> = self
            .plugins
            .names()
            .into_iter()
            .rev()
            .map(str::to_owned)
            .collect();
        for name in plugins {
            if let Err(e) = self.plugins.unload(&name) {
                warn!(plugin = %name, error = %e, "Plugin unload failed");
                first_error.get_or_insert(e.into());
            }
        }

        lock.release();
        info!("Host stopped");
        first_error.map_or(Ok(()), Err)
    }

    /// Whether the host still holds its data directory.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock.is_some()
    }

    /// The locked data directory, while running.
    #[must_use]
    pub fn data_dir(&self) -> Option<&Path> {
        self.lock.as_ref().map(DirectoryLock::path)
    }

    /// The configuration the host was started with.
    #[must_use]
    pub fn config(&self) -> &PlasmaConfig {
        &self.config
    }

    /// The plugin registry.
    #[must_use]
    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    /// The module registry.
    #[must_use]
    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    /// Mutable access to the module registry, for loading extra modules.
    pub fn modules_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.modules
    }

    /// The hook interface, while the hook manager is loaded.
    #[must_use]
    pub fn hooks(&self) -> Option<&HookInterface> {
        self.modules
            .interfaces()
            .get_as::<HookInterface>(HookInterface::NAME)
            .ok()
    }

    fn dispatch(&self, event: &str, payload: &serde_json::Value) {
        if let Some(hooks) = self.hooks() {
            hooks.dispatch(event, payload);
        }
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!(error = %e, "Host shutdown error during drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use plasma_core::LockError;
    use tempfile::TempDir;

    use super::*;

    fn options_in(dir: &Path) -> HostOptions {
        let mut config = PlasmaConfig::default();
        config.world.storage.base_dir = dir.join("world");
        config.world.storage.backup_dir = dir.join("world").join("backups");
        HostOptions::new(config)
    }

    #[test]
    fn start_loads_builtins_and_locks() {
        let tmp = TempDir::new().unwrap();
        let host = Host::start(options_in(tmp.path())).unwrap();

        assert!(host.is_running());
        assert_eq!(host.plugins().names(), vec![PlasmaServer::NAME]);
        assert_eq!(
            host.modules().names(),
            vec![CrashReporter::NAME, HookManager::NAME]
        );
        assert!(host.hooks().is_some());
        assert!(DirectoryLock::is_locked(tmp.path().join("world")).unwrap());
        assert!(tmp.path().join("world").join(CRASH_DIR_NAME).is_dir());
    }

    #[test]
    fn shutdown_unloads_and_releases() {
        let tmp = TempDir::new().unwrap();
        let mut host = Host::start(options_in(tmp.path())).unwrap();

        host.shutdown().unwrap();

        assert!(!host.is_running());
        assert!(host.data_dir().is_none());
        assert!(host.plugins().is_empty());
        assert!(host.modules().is_empty());
        assert!(host.modules().interfaces().is_empty());
        assert!(!DirectoryLock::is_locked(tmp.path().join("world")).unwrap());

        // Second call is a no-op.
        host.shutdown().unwrap();
    }

    #[test]
    fn second_host_on_same_directory_is_lock_held() {
        let tmp = TempDir::new().unwrap();
        let _first = Host::start(options_in(tmp.path())).unwrap();

        let err = Host::start(options_in(tmp.path())).unwrap_err();
        assert!(err.is_lock_held());
        assert!(matches!(err, HostError::Lock(LockError::LockHeld { .. })));
    }

    #[test]
    fn drop_releases_lock() {
        let tmp = TempDir::new().unwrap();
        drop(Host::start(options_in(tmp.path())).unwrap());

        let again = Host::start(options_in(tmp.path()));
        assert!(again.is_ok());
    }

    #[test]
    fn stopping_event_reaches_handlers() {
        let tmp = TempDir::new().unwrap();
        let mut host = Host::start(options_in(tmp.path())).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        host.hooks()
            .unwrap()
            .register(events::SERVER_STOPPING, move |payload| {
                sink.lock().unwrap().push(payload["world"].to_string());
            });

        host.shutdown().unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["\"world\""]);
    }

    #[test]
    fn custom_crash_dir_is_used() {
        let tmp = TempDir::new().unwrap();
        let crash_dir = tmp.path().join("dumps");
        let _host = Host::start(options_in(tmp.path()).with_crash_dump_dir(&crash_dir)).unwrap();
        assert!(crash_dir.is_dir());
    }

    #[test]
    fn failed_start_releases_lock() {
        let tmp = TempDir::new().unwrap();
        // A file where the backup directory should go makes the plugin fail.
        std::fs::create_dir_all(tmp.path().join("world")).unwrap();
        std::fs::write(tmp.path().join("world").join("backups"), b"").unwrap();

        let err = Host::start(options_in(tmp.path())).unwrap_err();
        assert!(matches!(err, HostError::Plugin(_)));
        assert!(!DirectoryLock::is_locked(tmp.path().join("world")).unwrap());
    }
}
