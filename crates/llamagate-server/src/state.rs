//! Shared state handed to every connection task.

use std::sync::Arc;

use llamagate_config::ConfigStore;

use crate::session_manager::ModelSession;

/// Cloned into each connection task. The session is the only shared
/// mutable state; the store is read-only from the server's point of view
/// (template lookup and the tags listing).
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ModelSession>,
    pub store: Arc<dyn ConfigStore>,
}
