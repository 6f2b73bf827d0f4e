//! Application state for the HTTP server.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::GridSettings;
use crate::loader::WindowedLoader;
use crate::store::FullStore;

/// Shared application state passed to all handlers.
///
/// Loader sessions are created per venue on first use and live for the
/// process; each venue's session owns its accumulated days and views, so
/// nothing leaks across venues.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FullStore>,
    pub settings: GridSettings,
    sessions: Arc<RwLock<HashMap<String, Arc<WindowedLoader>>>>,
}

impl AppState {
    /// Create a new application state with the given store and settings.
    pub fn new(store: Arc<dyn FullStore>, settings: GridSettings) -> Self {
        Self {
            store,
            settings,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get or create the loader session for a venue.
    pub fn session(&self, venue: &str) -> Arc<WindowedLoader> {
        if let Some(session) = self.sessions.read().get(venue) {
            return Arc::clone(session);
        }

        let mut sessions = self.sessions.write();
        Arc::clone(sessions.entry(venue.to_string()).or_insert_with(|| {
            Arc::new(WindowedLoader::new(
                venue,
                Arc::clone(&self.store),
                self.settings.clone(),
            ))
        }))
    }

    /// Drop a venue's session, discarding its accumulated state.
    pub fn evict_session(&self, venue: &str) {
        if let Some(session) = self.sessions.write().remove(venue) {
            session.reset();
        }
    }
}
