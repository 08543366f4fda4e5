//! Recording plugins, modules and interfaces.

use plasma_modules::{Interface, InterfaceRegistry, Module, ModuleError, ModuleResult};
use plasma_plugins::{Plugin, PluginError, PluginRegistry, PluginResult};
use tracing::debug;

use crate::fixtures::Journal;

/// A named interface with no behaviour beyond identifying its owner.
#[derive(Debug, Clone)]
pub struct TestInterface {
    name: String,
    owner: String,
}

impl TestInterface {
    /// Create an interface called `name`, registered by `owner`.
    #[must_use]
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
        }
    }

    /// The module that registered this interface.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

impl Interface for TestInterface {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Plugin that journals `init:<name>` and `uninit:<name>`.
#[derive(Debug)]
pub struct TestPlugin {
    name: String,
    version: String,
    journal: Journal,
    fail_init: bool,
    fail_uninit: bool,
}

impl TestPlugin {
    /// Create a plugin with version `1.0`.
    #[must_use]
    pub fn new(name: impl Into<String>, journal: &Journal) -> Self {
        Self {
            name: name.into(),
            version: "1.0".to_owned(),
            journal: journal.clone(),
            fail_init: false,
            fail_uninit: false,
        }
    }

    /// Set the version string.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Make `initialize` fail.
    #[must_use]
    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Make `uninitialize` fail.
    #[must_use]
    pub fn failing_uninit(mut self) -> Self {
        self.fail_uninit = true;
        self
    }
}

impl Plugin for TestPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn initialize(&mut self, _registry: &mut PluginRegistry) -> PluginResult<()> {
        self.journal.record(format!("init:{}", self.name));
        if self.fail_init {
            return Err(PluginError::Other(format!("{} refused to start", self.name)));
        }
        Ok(())
    }

    fn uninitialize(&mut self, _registry: &mut PluginRegistry) -> PluginResult<()> {
        self.journal.record(format!("uninit:{}", self.name));
        if self.fail_uninit {
            return Err(PluginError::Other(format!("{} refused to stop", self.name)));
        }
        Ok(())
    }
}

/// Module that registers [`TestInterface`]s and journals its lifecycle.
#[derive(Debug)]
pub struct TestModule {
    name: String,
    journal: Journal,
    offers: Vec<String>,
    requires: Vec<String>,
    leaves_interfaces: bool,
}

impl TestModule {
    /// Create a module that offers nothing.
    #[must_use]
    pub fn new(name: impl Into<String>, journal: &Journal) -> Self {
        Self {
            name: name.into(),
            journal: journal.clone(),
            offers: Vec::new(),
            requires: Vec::new(),
            leaves_interfaces: false,
        }
    }

    /// Register an interface called `interface` on initialize.
    #[must_use]
    pub fn offering(mut self, interface: impl Into<String>) -> Self {
        self.offers.push(interface.into());
        self
    }

    /// Fail initialize unless `interface` is already registered.
    #[must_use]
    pub fn requiring(mut self, interface: impl Into<String>) -> Self {
        self.requires.push(interface.into());
        self
    }

    /// Skip unregistering on uninitialize.
    #[must_use]
    pub fn leaving_interfaces(mut self) -> Self {
        self.leaves_interfaces = true;
        self
    }
}

impl Module for TestModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, interfaces: &mut InterfaceRegistry) -> ModuleResult<()> {
        for required in &self.requires {
            let iface = interfaces.get(required)?;
            debug!(module = %self.name, interface = %iface.name(), "Found dependency");
        }
        for offered in &self.offers {
            interfaces.register(Box::new(TestInterface::new(offered, &self.name)))?;
        }
        self.journal.record(format!("init:{}", self.name));
        Ok(())
    }

    fn uninitialize(&mut self, interfaces: &mut InterfaceRegistry) -> ModuleResult<()> {
        self.journal.record(format!("uninit:{}", self.name));
        if !self.leaves_interfaces {
            for offered in &self.offers {
                interfaces.unregister(offered)?;
            }
        }
        Ok(())
    }
}

/// Module that registers some interfaces, then fails to initialize.
#[derive(Debug)]
pub struct FailingModule {
    name: String,
    journal: Journal,
    registers_first: Vec<String>,
}

impl FailingModule {
    /// Create a module that registers `registers_first` and then errors.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, registers_first: I, journal: &Journal) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            journal: journal.clone(),
            registers_first: registers_first.into_iter().map(Into::into).collect(),
        }
    }
}

impl Module for FailingModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, interfaces: &mut InterfaceRegistry) -> ModuleResult<()> {
        self.journal.record(format!("init:{}", self.name));
        for iface in &self.registers_first {
            interfaces.register(Box::new(TestInterface::new(iface, &self.name)))?;
        }
        Err(ModuleError::Other(format!("{} failed half-way", self.name)))
    }

    fn uninitialize(&mut self, _interfaces: &mut InterfaceRegistry) -> ModuleResult<()> {
        self.journal.record(format!("uninit:{}", self.name));
        Ok(())
    }
}
