//! User configuration module for the dashboard's credential list.
//!
//! Accounts are declared as `[[users]]` tables in config.toml. This is a static
//! list with plain-text passwords, matching the access gate the dashboard has
//! always had; it is not a security boundary.

use serde::Deserialize;

/// A single account allowed to log in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UserConfig {
    /// Login name (usually the operator's phone number)
    pub username: String,
    /// Plain-text password
    pub password: String,
}

impl UserConfig {
    /// Creates an account entry.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
