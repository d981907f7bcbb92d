//! Shared types for the admission API layer.

use std::sync::{Arc, Mutex};

use crate::auth::{AdminCredential, LoginGuard, SessionStore};
use crate::state::AppState;

/// Shared context for all API routes and middleware.
///
/// Wraps the application state plus the staff authentication stores.
/// Cloning is cheap; every field is behind an `Arc`.
#[derive(Clone)]
pub struct ApiContext {
    pub state: Arc<AppState>,
    pub credential: Arc<AdminCredential>,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub login_guard: Arc<Mutex<LoginGuard>>,
}

impl ApiContext {
    pub fn new(state: Arc<AppState>, credential: AdminCredential) -> Self {
        Self {
            state,
            credential: Arc::new(credential),
            sessions: Arc::new(Mutex::new(SessionStore::new())),
            login_guard: Arc::new(Mutex::new(LoginGuard::new())),
        }
    }
}
