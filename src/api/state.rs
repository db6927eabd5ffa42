//! Application state for the audit API.

use std::sync::Arc;

use crate::config::ConfigLoader;

use super::session::SessionStore;

/// Shared application state.
///
/// Cloned into every handler; the configuration and session table are
/// shared behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    sessions: Arc<SessionStore>,
}

impl AppState {
    /// Creates application state with an empty session table.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionStore::new()),
        }
    }

    /// Returns the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a shared handle to the configuration, for blocking tasks.
    pub fn shared_config(&self) -> Arc<ConfigLoader> {
        Arc::clone(&self.config)
    }

    /// Returns the session table.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}
