use std::sync::Arc;

use dioxus::prelude::*;

use services::{AuthService, ProgressService};

/// What the UI needs from the application composition root.
pub trait UiApp: Send + Sync {
    fn auth(&self) -> Arc<AuthService>;
    fn progress(&self) -> Arc<ProgressService>;
}

#[derive(Clone)]
pub struct AppContext {
    auth: Arc<AuthService>,
    progress: Arc<ProgressService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            auth: app.auth(),
            progress: app.progress(),
        }
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}

/// Per-window session state: who is signed in, if anyone.
///
/// Provided at the app root; logout simply clears the signal.
#[derive(Clone, Copy)]
pub struct Session {
    pub user: Signal<Option<String>>,
}

impl Session {
    #[must_use]
    pub fn current_user(&self) -> Option<String> {
        self.user.read().clone()
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
