//! Login gate and per-user session state.
//!
//! The credential list comes from configuration and is injected; sessions live
//! in memory only and are keyed by the caller's chat user id. A session stays
//! logged in across commands until `logout`.

use crate::{
    config::UserConfig,
    core::view::ViewFilter,
    errors::{Error, Result},
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Static list of accounts allowed to log in.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: Vec<UserConfig>,
}

impl CredentialStore {
    /// Creates a store from configured accounts.
    #[must_use]
    pub const fn new(users: Vec<UserConfig>) -> Self {
        Self { users }
    }

    /// Returns true when the exact username/password pair is listed.
    #[must_use]
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .iter()
            .any(|user| user.username == username && user.password == password)
    }

    /// Number of configured accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true when no accounts are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Light or dark presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Light colours
    #[default]
    Light,
    /// Dark colours
    Dark,
}

impl Theme {
    /// Returns the other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// State kept for one logged-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Account the session was opened with
    pub username: String,
    /// Active filter and search text
    pub filter: ViewFilter,
    /// Zero-based page index of the table
    pub page: usize,
    /// Presentation theme
    pub theme: Theme,
}

/// Outcome of a successful login call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A new session was opened
    LoggedIn,
    /// The caller already had a session; nothing changed
    AlreadyLoggedIn,
}

/// In-memory sessions keyed by caller id.
#[derive(Debug, Default)]
pub struct SessionStore {
    credentials: CredentialStore,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    /// Creates an empty store gated by the given credentials.
    #[must_use]
    pub fn new(credentials: CredentialStore) -> Self {
        Self {
            credentials,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Opens a session for `key` if the credentials are listed.
    ///
    /// # Errors
    /// Returns `Error::InvalidCredentials` when the pair is not listed.
    pub async fn login(&self, key: &str, username: &str, password: &str) -> Result<LoginOutcome> {
        if !self.credentials.verify(username, password) {
            warn!(key, "Rejected login attempt");
            return Err(Error::InvalidCredentials);
        }

        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(key) {
            return Ok(LoginOutcome::AlreadyLoggedIn);
        }

        sessions.insert(
            key.to_string(),
            Session {
                username: username.to_string(),
                ..Session::default()
            },
        );
        info!(key, username, "Session opened");
        Ok(LoginOutcome::LoggedIn)
    }

    /// Closes the session for `key`. Returns whether one existed.
    pub async fn logout(&self, key: &str) -> bool {
        let removed = self.sessions.write().await.remove(key).is_some();
        if removed {
            info!(key, "Session closed");
        }
        removed
    }

    /// Returns true when `key` has an open session.
    pub async fn is_logged_in(&self, key: &str) -> bool {
        self.sessions.read().await.contains_key(key)
    }

    /// Returns a copy of the session for `key`.
    ///
    /// # Errors
    /// Returns `Error::NotLoggedIn` when there is no session.
    pub async fn session(&self, key: &str) -> Result<Session> {
        self.sessions
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or(Error::NotLoggedIn)
    }

    /// Applies `update` to the session for `key` and returns the updated copy.
    ///
    /// # Errors
    /// Returns `Error::NotLoggedIn` when there is no session.
    pub async fn update<F>(&self, key: &str, update: F) -> Result<Session>
    where
        F: FnOnce(&mut Session),
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(key).ok_or(Error::NotLoggedIn)?;
        update(session);
        Ok(session.clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_verify_exact_pair_only() {
        let store = test_credentials();
        assert!(store.verify("01815128906", "Abc1234#"));
        assert!(!store.verify("01815128906", "abc1234#"));
        assert!(!store.verify("nobody", "Abc1234#"));
        assert!(!store.verify("", ""));
    }

    #[tokio::test]
    async fn test_login_once_per_session() -> Result<()> {
        let sessions = SessionStore::new(test_credentials());

        let first = sessions.login("user-1", "01815128906", "Abc1234#").await?;
        assert_eq!(first, LoginOutcome::LoggedIn);

        let second = sessions.login("user-1", "01815128906", "Abc1234#").await?;
        assert_eq!(second, LoginOutcome::AlreadyLoggedIn);

        // Still logged in on later commands until logout
        assert!(sessions.is_logged_in("user-1").await);
        assert!(!sessions.is_logged_in("user-2").await);
        Ok(())
    }

    #[tokio::test]
    async fn test_bad_credentials_rejected() {
        let sessions = SessionStore::new(test_credentials());
        let result = sessions.login("user-1", "01815128906", "wrong").await;
        assert!(matches!(result, Err(Error::InvalidCredentials)));
        assert!(!sessions.is_logged_in("user-1").await);
    }

    #[tokio::test]
    async fn test_logout_clears_session() -> Result<()> {
        let sessions = SessionStore::new(test_credentials());
        sessions.login("user-1", "01815128906", "Abc1234#").await?;

        assert!(sessions.logout("user-1").await);
        assert!(!sessions.is_logged_in("user-1").await);
        assert!(!sessions.logout("user-1").await);
        assert!(matches!(
            sessions.session("user-1").await,
            Err(Error::NotLoggedIn)
        ));

        // Logging in again opens a fresh session
        let outcome = sessions.login("user-1", "01815128906", "Abc1234#").await?;
        assert_eq!(outcome, LoginOutcome::LoggedIn);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_session_state() -> Result<()> {
        let sessions = SessionStore::new(test_credentials());
        sessions.login("user-1", "01815128906", "Abc1234#").await?;

        let updated = sessions
            .update("user-1", |s| {
                s.page = 3;
                s.theme = s.theme.toggled();
                s.filter.search = "mirpur".to_string();
            })
            .await?;
        assert_eq!(updated.page, 3);
        assert_eq!(updated.theme, Theme::Dark);

        let stored = sessions.session("user-1").await?;
        assert_eq!(stored, updated);
        assert_eq!(stored.username, "01815128906");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_requires_session() {
        let sessions = SessionStore::new(test_credentials());
        let result = sessions.update("ghost", |s| s.page = 1).await;
        assert!(matches!(result, Err(Error::NotLoggedIn)));
    }
}
