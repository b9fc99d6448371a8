//! Process-wide session store.
//!
//! Holds the bearer token pair and username for the logged-in operator.
//! Only two writers exist by contract: the login/logout flow and the API
//! client's 401 path. Everything else reads.

use std::sync::RwLock;

/// Credentials for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Shared token store. Wrap in an `Arc` and hand clones of the handle to the
/// client and the UI.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded from persisted credentials.
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: RwLock::new(Some(session)),
        }
    }

    /// Replace the session (login flow only).
    pub fn establecer(&self, session: Session) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(session);
        }
    }

    /// Drop the session (logout flow and the client's 401 path only).
    pub fn limpiar(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }

    pub fn activa(&self) -> bool {
        self.inner.read().is_ok_and(|g| g.is_some())
    }

    /// Current access token, if logged in.
    pub fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.as_ref().map(|s| s.access_token.clone()))
    }

    /// Current refresh token, if logged in.
    pub fn refresh_token(&self) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.as_ref().map(|s| s.refresh_token.clone()))
    }

    pub fn username(&self) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.as_ref().map(|s| s.username.clone()))
    }

    /// Snapshot of the whole session, for persisting to the config file.
    pub fn sesion(&self) -> Option<Session> {
        self.inner.read().ok().and_then(|g| g.clone())
    }
}
