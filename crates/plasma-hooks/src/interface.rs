//! The hook interface offered by the hook manager.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use plasma_modules::Interface;
use serde_json::Value;
use tracing::{debug, trace};

use crate::hook::HookHandler;

type HookTable = HashMap<String, Vec<HookHandler>>;

/// Table of event handlers, shared between the registered interface and the
/// module that registered it.
///
/// Cloning yields another handle onto the same table.
#[derive(Clone, Default)]
pub struct HookInterface {
    hooks: Arc<Mutex<HookTable>>,
}

impl HookInterface {
    /// The name this interface is registered under.
    pub const NAME: &'static str = "plasma.hook_manager.hook_interface";

    /// Create an interface with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a handler to `event`. Handlers run in registration order.
    pub fn register<F>(&self, event: impl Into<String>, handler: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let event = event.into();
        debug!(event = %event, "Registering hook handler");
        self.table()
            .entry(event)
            .or_default()
            .push(Arc::new(handler));
    }

    /// Run every handler attached to `event` with `payload`.
    ///
    /// Returns the number of handlers invoked; zero when none are attached.
    /// Handlers run outside the table lock, so a handler may register
    /// further handlers. Those only see later dispatches.
    pub fn dispatch(&self, event: &str, payload: &Value) -> usize {
        let handlers: Vec<HookHandler> = self.table().get(event).cloned().unwrap_or_default();
        trace!(event = %event, handlers = handlers.len(), "Dispatching hook");
        for handler in &handlers {
            handler(payload);
        }
        handlers.len()
    }

    /// Number of handlers attached to `event`.
    #[must_use]
    pub fn handler_count(&self, event: &str) -> usize {
        self.table().get(event).map_or(0, Vec::len)
    }

    /// Events with at least one handler, sorted.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        let mut events: Vec<String> = self.table().keys().cloned().collect();
        events.sort_unstable();
        events
    }

    /// Detach every handler.
    pub fn clear(&self) {
        self.table().clear();
    }

    fn table(&self) -> MutexGuard<'_, HookTable> {
        self.hooks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Interface for HookInterface {
    fn name(&self) -> &str {
        Self::NAME
    }
}

impl std::fmt::Debug for HookInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookInterface")
            .field("events", &self.events())
            .finish()
    }
}
