//! Explicit session context for REST calls.
//!
//! A session starts on login success and ends on logout or on the first
//! 401 response. Anything that talks to the backend receives the context
//! explicitly instead of reading a global token.

use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

/// Credentials of an active session.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Bearer token presented to the backend.
    pub token: String,
    /// Whether the logged-in account is a resident (restricted views).
    pub is_resident: bool,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("token", &"[hidden]")
            .field("is_resident", &self.is_resident)
            .finish()
    }
}

/// Shared session context. Wrap in `Arc` to hand it to several clients.
#[derive(Debug, Default)]
pub struct SessionContext {
    state: RwLock<Option<SessionState>>,
}

impl SessionContext {
    /// Creates a context with no active session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that already holds a session.
    #[must_use]
    pub fn with_session(token: impl Into<String>, is_resident: bool) -> Self {
        Self {
            state: RwLock::new(Some(SessionState {
                token: token.into(),
                is_resident,
            })),
        }
    }

    /// Starts a session after a successful login, replacing any previous one.
    pub async fn begin(&self, token: impl Into<String>, is_resident: bool) {
        *self.state.write().await = Some(SessionState {
            token: token.into(),
            is_resident,
        });
    }

    /// Ends the session (logout or 401). Idempotent.
    pub async fn end(&self) {
        self.state.write().await.take();
    }

    /// Returns true while a session is active.
    pub async fn is_active(&self) -> bool {
        self.state.read().await.is_some()
    }

    /// Returns true if the active session belongs to a resident.
    pub async fn is_resident(&self) -> bool {
        self.state
            .read()
            .await
            .as_ref()
            .is_some_and(|s| s.is_resident)
    }

    /// Returns the bearer token of the active session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` when no session is active.
    pub async fn bearer(&self) -> AppResult<String> {
        self.state
            .read()
            .await
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or_else(|| AppError::Unauthorized("no active session".to_string()))
    }
}
