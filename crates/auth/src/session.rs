//! Authentication state shared by the guard and the orchestration layer.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AuthzError, UserInfo};

/// Current authentication state.
///
/// # Invariants
/// - `is_logged_in() == token.is_some()`.
/// - `user` is only ever present together with a token; losing the token
///   clears the user in the same step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SessionRepr", into = "SessionRepr")]
pub struct Session {
    token: Option<String>,
    user: Option<UserInfo>,
    established_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A logged-out session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A logged-in session (successful login).
    pub fn authenticated(token: impl Into<String>, user: UserInfo, now: DateTime<Utc>) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
            established_at: Some(now),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    pub fn established_at(&self) -> Option<DateTime<Utc>> {
        self.established_at
    }

    /// Replace the identity record (e.g. after `/auth/info`).
    pub fn set_user(&mut self, user: UserInfo) -> Result<(), AuthzError> {
        if !self.is_logged_in() {
            return Err(AuthzError::NotAuthenticated);
        }
        self.user = Some(user);
        Ok(())
    }

    /// Swap the credential in place (token refresh). Identity is kept.
    pub fn set_token(&mut self, token: impl Into<String>) -> Result<(), AuthzError> {
        if !self.is_logged_in() {
            return Err(AuthzError::NotAuthenticated);
        }
        self.token = Some(token.into());
        Ok(())
    }

    /// Destroy the session (logout, credential-invalid response).
    pub fn clear(&mut self) {
        *self = Self::anonymous();
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRepr {
    token: Option<String>,
    #[serde(default)]
    user: Option<UserInfo>,
    #[serde(default)]
    established_at: Option<DateTime<Utc>>,
}

impl From<SessionRepr> for Session {
    fn from(repr: SessionRepr) -> Self {
        // A persisted user without a token is stale; drop it.
        match repr.token {
            Some(token) => Self {
                token: Some(token),
                user: repr.user,
                established_at: repr.established_at,
            },
            None => Self::anonymous(),
        }
    }
}

impl From<Session> for SessionRepr {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            user: session.user,
            established_at: session.established_at,
        }
    }
}

/// Shared, injectable handle to the [`Session`].
///
/// Cloning the store clones the handle, not the state. Readers take a
/// [`snapshot`](Self::snapshot); only the orchestration layer writes.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.read().is_logged_in()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token().map(str::to_string)
    }

    pub fn establish(&self, token: impl Into<String>, user: UserInfo, now: DateTime<Utc>) {
        *self.write() = Session::authenticated(token, user, now);
        tracing::info!("session established");
    }

    pub fn set_user(&self, user: UserInfo) -> Result<(), AuthzError> {
        self.write().set_user(user)
    }

    pub fn set_token(&self, token: impl Into<String>) -> Result<(), AuthzError> {
        self.write().set_token(token)
    }

    pub fn clear(&self) {
        let mut session = self.write();
        if session.is_logged_in() {
            tracing::info!("session cleared");
        }
        session.clear();
    }

    // A poisoned lock still holds a consistent `Session`: every mutation above
    // is a single assignment.
    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Permission, Role};
    use kinit_core::EntityId;

    fn alice() -> UserInfo {
        UserInfo::new(
            EntityId::from("2"),
            "alice",
            [Role::new("user")],
            [Permission::new("user:view")],
        )
    }

    #[test]
    fn logged_in_tracks_token() {
        let store = SessionStore::new();
        assert!(!store.is_logged_in());

        store.establish("t-1", alice(), Utc::now());
        assert!(store.is_logged_in());
        assert_eq!(store.token().as_deref(), Some("t-1"));

        store.clear();
        let session = store.snapshot();
        assert!(!session.is_logged_in());
        assert!(session.user().is_none());
    }

    #[test]
    fn user_cannot_be_set_without_token() {
        let mut session = Session::anonymous();
        assert_eq!(session.set_user(alice()), Err(AuthzError::NotAuthenticated));
        assert!(session.user().is_none());
    }

    #[test]
    fn token_refresh_keeps_identity() {
        let store = SessionStore::new();
        store.establish("old", alice(), Utc::now());
        store.set_token("new").unwrap();

        let session = store.snapshot();
        assert_eq!(session.token(), Some("new"));
        assert_eq!(session.user().map(|u| u.username.as_str()), Some("alice"));
    }

    #[test]
    fn clones_share_state() {
        let store = SessionStore::new();
        let other = store.clone();
        store.establish("t", alice(), Utc::now());
        assert!(other.is_logged_in());
    }

    #[test]
    fn persisted_user_without_token_is_dropped() {
        let json = r#"{"token": null, "user": {"id": "2", "username": "alice"}}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert!(!session.is_logged_in());
        assert!(session.user().is_none());
    }
}
