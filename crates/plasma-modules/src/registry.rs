//! Module registry.
//!
//! Owns loaded modules and the [`InterfaceRegistry`] they register their
//! capabilities into. Load order is the dependency order: the registry
//! imposes no graph of its own and unloads in reverse.

use std::collections::HashMap;

use tracing::{debug, info, trace, warn};

use crate::error::{ModuleError, ModuleResult};
use crate::interface::{InterfaceRegistry, RegistrationId};
use crate::module::Module;

/// A loaded module plus the interface registrations made while it
/// initialized.
struct LoadedModule {
    module: Box<dyn Module>,
    interfaces: Vec<(String, RegistrationId)>,
}

/// Registry of loaded modules.
pub struct ModuleRegistry {
    modules: HashMap<String, LoadedModule>,
    /// Module names in load order.
    order: Vec<String>,
    interfaces: InterfaceRegistry,
}

impl ModuleRegistry {
    /// Create an empty module registry with an empty interface registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_interfaces(InterfaceRegistry::new())
    }

    /// Create a module registry around an existing interface registry
    /// (e.g. one pre-seeded with host-provided interfaces).
    #[must_use]
    pub fn with_interfaces(interfaces: InterfaceRegistry) -> Self {
        Self {
            modules: HashMap::new(),
            order: Vec::new(),
            interfaces,
        }
    }

    /// Load a module, taking ownership of it.
    ///
    /// The name is checked before `initialize` runs, so a colliding module
    /// is never initialized. If `initialize` fails, every interface it
    /// registered is unregistered again and the module is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleError::EmptyName`] for a nameless module,
    /// [`ModuleError::AlreadyLoaded`] on a name collision, or
    /// [`ModuleError::InitializationFailed`] wrapping the module's own error.
    pub fn load(&mut self, mut module: Box<dyn Module>) -> ModuleResult<()> {
        let name = module.name().to_owned();
        trace!(module = %name, "Loading module");
        if name.is_empty() {
            return Err(ModuleError::EmptyName);
        }
        if self.modules.contains_key(&name) {
            return Err(ModuleError::AlreadyLoaded(name));
        }

        let before = self.interfaces.registrations();

        let result = module.initialize(&mut self.interfaces);
        let added = self.registered_since(&before);

        if let Err(e) = result {
            for (iface, id) in &added {
                warn!(module = %name, interface = %iface, "Rolling back interface of failed module");
                self.interfaces.unregister_registration(iface, *id);
            }
            return Err(ModuleError::InitializationFailed {
                module: name,
                source: Box::new(e),
            });
        }

        info!(module = %name, interfaces = added.len(), "Loaded module");
        self.order.push(name.clone());
        self.modules.insert(
            name,
            LoadedModule {
                module,
                interfaces: added,
            },
        );
        Ok(())
    }

    /// Unload a module by name.
    ///
    /// Calls `uninitialize`, removes any interface the module registered
    /// during `initialize` that is still present, then drops the module.
    /// An interface that was unregistered and registered again by someone
    /// else since then is a different registration and stays.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleError::NotFound`] if no module with that name is
    /// loaded, or [`ModuleError::UninitializationFailed`] if `uninitialize`
    /// failed. In the latter case the module is still unloaded.
    pub fn unload(&mut self, name: &str) -> ModuleResult<()> {
        let mut loaded = self
            .modules
            .remove(name)
            .ok_or_else(|| ModuleError::NotFound(name.to_owned()))?;
        self.order.retain(|n| n != name);

        trace!(module = %name, "Unloading module");
        let result = loaded.module.uninitialize(&mut self.interfaces);

        for (iface, id) in &loaded.interfaces {
            if self.interfaces.unregister_registration(iface, *id) {
                warn!(module = %name, interface = %iface, "Module left interface registered; removed");
            }
        }
        drop(loaded);

        match result {
            Ok(()) => {
                info!(module = %name, "Unloaded module");
                Ok(())
            },
            Err(e) => Err(ModuleError::UninitializationFailed {
                module: name.to_owned(),
                source: Box::new(e),
            }),
        }
    }

    /// Unload every module in reverse load order.
    ///
    /// Errors are logged, not returned, so one failing module cannot keep
    /// the others loaded.
    pub fn unload_all(&mut self) {
        while let Some(name) = self.order.pop() {
            if let Err(e) = self.unload(&name) {
                warn!(module = %name, error = %e, "Module unload error during unload_all");
            }
        }
        debug!("All modules unloaded");
    }

    /// Get a loaded module by name.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleError::NotFound`] if no module with that name is loaded.
    pub fn get(&self, name: &str) -> ModuleResult<&dyn Module> {
        self.modules
            .get(name)
            .map(|m| m.module.as_ref())
            .ok_or_else(|| ModuleError::NotFound(name.to_owned()))
    }

    /// Get a mutable reference to a loaded module by name.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleError::NotFound`] if no module with that name is loaded.
    pub fn get_mut(&mut self, name: &str) -> ModuleResult<&mut Box<dyn Module>> {
        self.modules
            .get_mut(name)
            .map(|m| &mut m.module)
            .ok_or_else(|| ModuleError::NotFound(name.to_owned()))
    }

    /// Whether a module with this name is loaded.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Loaded module names in load order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Number of loaded modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no modules are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// The interface registry modules register into.
    #[must_use]
    pub fn interfaces(&self) -> &InterfaceRegistry {
        &self.interfaces
    }

    /// Mutable access to the interface registry, for host-provided
    /// interfaces.
    pub fn interfaces_mut(&mut self) -> &mut InterfaceRegistry {
        &mut self.interfaces
    }

    /// Registrations present now that were not present in `before`,
    /// including names that were replaced in between.
    fn registered_since(
        &self,
        before: &HashMap<String, RegistrationId>,
    ) -> Vec<(String, RegistrationId)> {
        let mut added: Vec<(String, RegistrationId)> = self
            .interfaces
            .registrations()
            .into_iter()
            .filter(|(name, id)| before.get(name) != Some(id))
            .collect();
        added.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        added
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ModuleRegistry {
    fn drop(&mut self) {
        if !self.order.is_empty() {
            self.unload_all();
        }
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.order)
            .field("interfaces", &self.interfaces)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::InterfaceError;
    use crate::interface::Interface;

    type Journal = Arc<Mutex<Vec<String>>>;

    #[derive(Debug)]
    struct NamedInterface(String);

    impl Interface for NamedInterface {
        fn name(&self) -> &str {
            &self.0
        }
    }

    /// Registers `interfaces` on initialize and (optionally) unregisters
    /// them on uninitialize, recording every call.
    struct TestModule {
        name: String,
        interfaces: Vec<String>,
        clean_up: bool,
        fail_after: Option<usize>,
        journal: Journal,
    }

    impl TestModule {
        fn new(name: &str, interfaces: &[&str], journal: &Journal) -> Self {
            Self {
                name: name.to_owned(),
                interfaces: interfaces.iter().map(|s| (*s).to_owned()).collect(),
                clean_up: true,
                fail_after: None,
                journal: Arc::clone(journal),
            }
        }

        fn sloppy(mut self) -> Self {
            self.clean_up = false;
            self
        }

        fn failing_after(mut self, registered: usize) -> Self {
            self.fail_after = Some(registered);
            self
        }
    }

    impl Module for TestModule {
        fn name(&self) -> &str {
            &self.name
        }

        fn initialize(&mut self, interfaces: &mut InterfaceRegistry) -> ModuleResult<()> {
            self.journal
                .lock()
                .unwrap()
                .push(format!("init:{}", self.name));
            for (i, iface) in self.interfaces.iter().enumerate() {
                if self.fail_after == Some(i) {
                    return Err(ModuleError::Other("boom".into()));
                }
                interfaces.register(Box::new(NamedInterface(iface.clone())))?;
            }
            Ok(())
        }

        fn uninitialize(&mut self, interfaces: &mut InterfaceRegistry) -> ModuleResult<()> {
            self.journal
                .lock()
                .unwrap()
                .push(format!("uninit:{}", self.name));
            if self.clean_up {
                for iface in &self.interfaces {
                    interfaces.unregister(iface)?;
                }
            }
            Ok(())
        }
    }

    fn journal() -> Journal {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[test]
    fn load_registers_interfaces() {
        let j = journal();
        let mut registry = ModuleRegistry::new();
        registry
            .load(Box::new(TestModule::new("a", &["a.iface"], &j)))
            .unwrap();

        assert!(registry.contains("a"));
        assert_eq!(registry.get("a").unwrap().name(), "a");
        assert!(registry.interfaces().get("a.iface").is_ok());
    }

    #[test]
    fn unload_removes_module_and_interfaces() {
        let j = journal();
        let mut registry = ModuleRegistry::new();
        registry
            .load(Box::new(TestModule::new("a", &["a.iface"], &j)))
            .unwrap();

        registry.unload("a").unwrap();

        assert!(matches!(registry.get("a"), Err(ModuleError::NotFound(_))));
        assert!(matches!(
            registry.interfaces().get("a.iface"),
            Err(InterfaceError::NotFound(_))
        ));
        assert_eq!(*j.lock().unwrap(), vec!["init:a", "uninit:a"]);
    }

    #[test]
    fn duplicate_load_is_rejected_before_initialize() {
        let j = journal();
        let mut registry = ModuleRegistry::new();
        registry
            .load(Box::new(TestModule::new("a", &["a.iface"], &j)))
            .unwrap();

        let err = registry
            .load(Box::new(TestModule::new("a", &["a.other"], &j)))
            .unwrap_err();

        assert!(matches!(err, ModuleError::AlreadyLoaded(ref n) if n == "a"));
        assert_eq!(registry.len(), 1);
        assert!(!registry.interfaces().contains("a.other"));
        // The second module was never initialized.
        assert_eq!(*j.lock().unwrap(), vec!["init:a"]);
    }

    #[test]
    fn failed_initialize_rolls_back_interfaces() {
        let j = journal();
        let mut registry = ModuleRegistry::new();
        let module = TestModule::new("a", &["a.one", "a.two", "a.three"], &j).failing_after(2);

        let err = registry.load(Box::new(module)).unwrap_err();

        match err {
            ModuleError::InitializationFailed { module, source } => {
                assert_eq!(module, "a");
                assert!(matches!(*source, ModuleError::Other(_)));
            },
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(registry.is_empty());
        assert!(registry.interfaces().is_empty());
    }

    #[test]
    fn failed_initialize_keeps_earlier_modules_interfaces() {
        let j = journal();
        let mut registry = ModuleRegistry::new();
        registry
            .load(Box::new(TestModule::new("a", &["a.iface"], &j)))
            .unwrap();

        // "b" collides on an interface name owned by "a".
        let err = registry
            .load(Box::new(TestModule::new("b", &["b.iface", "a.iface"], &j)))
            .unwrap_err();

        assert!(matches!(err, ModuleError::InitializationFailed { .. }));
        assert!(registry.interfaces().contains("a.iface"));
        assert!(!registry.interfaces().contains("b.iface"));
        assert_eq!(registry.names(), vec!["a"]);
    }

    #[test]
    fn unload_cleans_up_forgotten_interfaces() {
        let j = journal();
        let mut registry = ModuleRegistry::new();
        registry
            .load(Box::new(TestModule::new("a", &["a.iface"], &j).sloppy()))
            .unwrap();

        registry.unload("a").unwrap();
        assert!(registry.interfaces().is_empty());
    }

    #[test]
    fn unload_keeps_interface_reregistered_by_another_module() {
        let j = journal();
        let mut registry = ModuleRegistry::new();
        registry
            .load(Box::new(TestModule::new("a", &["shared"], &j).sloppy()))
            .unwrap();
        // The host takes "shared" away and "b" registers its own.
        registry.interfaces_mut().unregister("shared").unwrap();
        registry
            .load(Box::new(TestModule::new("b", &["shared"], &j)))
            .unwrap();

        registry.unload("a").unwrap();

        assert!(registry.contains("b"));
        assert!(registry.interfaces().contains("shared"));
        registry.unload("b").unwrap();
        assert!(registry.interfaces().is_empty());
    }

    #[test]
    fn replacing_module_owns_the_replacement() {
        /// Swaps "shared" for its own on initialize.
        struct Replacer;
        impl Module for Replacer {
            fn name(&self) -> &str {
                "b"
            }
            fn initialize(&mut self, interfaces: &mut InterfaceRegistry) -> ModuleResult<()> {
                interfaces.unregister("shared")?;
                interfaces.register(Box::new(NamedInterface("shared".into())))?;
                Ok(())
            }
            fn uninitialize(&mut self, _interfaces: &mut InterfaceRegistry) -> ModuleResult<()> {
                Ok(())
            }
        }

        let j = journal();
        let mut registry = ModuleRegistry::new();
        registry
            .load(Box::new(TestModule::new("a", &["shared"], &j).sloppy()))
            .unwrap();
        registry.load(Box::new(Replacer)).unwrap();

        registry.unload("a").unwrap();
        assert!(registry.contains("b"));
        assert!(registry.interfaces().contains("shared"));

        // "b" never unregisters it itself; its own unload sweeps it.
        registry.unload("b").unwrap();
        assert!(registry.interfaces().is_empty());
    }

    #[test]
    fn unload_unknown_is_not_found() {
        let mut registry = ModuleRegistry::new();
        let err = registry.unload("ghost").unwrap_err();
        assert!(matches!(err, ModuleError::NotFound(ref n) if n == "ghost"));
    }

    #[test]
    fn uninitialize_error_still_unloads() {
        let j = journal();
        let mut registry = ModuleRegistry::new();
        registry
            .load(Box::new(TestModule::new("a", &["a.iface"], &j)))
            .unwrap();
        // Pull the interface out from under the module so its own
        // unregister call fails.
        registry.interfaces_mut().unregister("a.iface").unwrap();

        let err = registry.unload("a").unwrap_err();
        assert!(matches!(err, ModuleError::UninitializationFailed { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn later_module_can_see_earlier_interfaces() {
        struct Dependent;
        impl Module for Dependent {
            fn name(&self) -> &str {
                "dependent"
            }
            fn initialize(&mut self, interfaces: &mut InterfaceRegistry) -> ModuleResult<()> {
                interfaces.get("base.iface")?;
                Ok(())
            }
            fn uninitialize(&mut self, _interfaces: &mut InterfaceRegistry) -> ModuleResult<()> {
                Ok(())
            }
        }

        let j = journal();
        let mut registry = ModuleRegistry::new();
        assert!(registry.load(Box::new(Dependent)).is_err());

        registry
            .load(Box::new(TestModule::new("base", &["base.iface"], &j)))
            .unwrap();
        registry.load(Box::new(Dependent)).unwrap();
        assert_eq!(registry.names(), vec!["base", "dependent"]);
    }

    #[test]
    fn unload_all_runs_in_reverse_order() {
        let j = journal();
        let mut registry = ModuleRegistry::new();
        for name in ["a", "b", "c"] {
            registry
                .load(Box::new(TestModule::new(name, &[], &j)))
                .unwrap();
        }

        registry.unload_all();

        assert!(registry.is_empty());
        assert_eq!(
            *j.lock().unwrap(),
            vec!["init:a", "init:b", "init:c", "uninit:c", "uninit:b", "uninit:a"]
        );
    }

    #[test]
    fn drop_unloads_remaining_modules() {
        let j = journal();
        {
            let mut registry = ModuleRegistry::new();
            registry
                .load(Box::new(TestModule::new("a", &[], &j)))
                .unwrap();
            registry
                .load(Box::new(TestModule::new("b", &[], &j)))
                .unwrap();
        }
        assert_eq!(
            *j.lock().unwrap(),
            vec!["init:a", "init:b", "uninit:b", "uninit:a"]
        );
    }
}
