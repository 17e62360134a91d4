use std::sync::RwLock;

use tracing::info;

use shared_models::User;

/// The authenticated identity plus its opaque bearer credential.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Holds the current session for the lifetime of the process.
///
/// This is an explicit context object created at application start and
/// handed to whatever needs identity, not ambient global state. Many
/// readers, written only by `login`/`logout`. No operation here can fail
/// and none performs I/O; credential expiry shows up as a rejected remote
/// request, not as local validation.
#[derive(Debug, Default)]
pub struct SessionContext {
    inner: RwLock<Option<Session>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the identity and credential. Callers handle any follow-up
    /// navigation themselves.
    pub fn login(&self, user: User, token: impl Into<String>) {
        info!("Session opened for {} ({})", user.full_name, user.role);
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(Session {
            user,
            token: token.into(),
        });
    }

    /// Clear the session unconditionally. Idempotent.
    pub fn logout(&self) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if guard.take().is_some() {
            info!("Session closed");
        }
    }

    /// The stored pair, without validation of any kind.
    pub fn current(&self) -> Option<Session> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn user(&self) -> Option<User> {
        self.current().map(|s| s.user)
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|s| s.token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}
