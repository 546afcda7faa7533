//! Shared application state.

use std::sync::Arc;

use trailtale_session::application::controller::SessionController;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The session controller driving the single hunt session.
    pub controller: Arc<SessionController>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(controller: Arc<SessionController>) -> Self {
        Self { controller }
    }
}
