//! Hook handlers and well-known event names.

use std::sync::Arc;

use serde_json::Value;

/// A callback attached to a named event.
///
/// Handlers receive the payload passed to
/// [`HookInterface::dispatch`](crate::HookInterface::dispatch).
pub type HookHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Event names dispatched by the host itself.
pub mod events {
    /// Dispatched once every initial plugin and module is loaded.
    pub const SERVER_STARTED: &str = "server.started";
    /// Dispatched before the host starts unloading components.
    pub const SERVER_STOPPING: &str = "server.stopping";
}
