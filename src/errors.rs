//! Unified error types and result handling.
//!
//! Only two failures are shown to users as distinct kinds: rejected credentials
//! and a failed data load. Everything else is folded into a transient message
//! by the bot layer.

use thiserror::Error;

/// Errors produced anywhere in the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Username/password pair is not in the credential list
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Command requires a logged-in session
    #[error("You are not logged in. Use `/login` first.")]
    NotLoggedIn,

    /// Fetching or parsing one of the sheets failed
    #[error("Failed to fetch data: {message}")]
    DataLoad {
        /// What went wrong
        message: String,
    },

    /// No dataset has been loaded yet
    #[error("No data loaded yet. Use `/load` to fetch the sheets.")]
    NoData,

    /// Customer identifier is not present in the loaded dataset
    #[error("Customer '{customer_id}' not found")]
    CustomerNotFound {
        /// Identifier that was looked up
        customer_id: String,
    },

    /// User-supplied option could not be interpreted
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input
        message: String,
    },

    /// Text generation failed after all retries
    #[error("Message generation failed: {message}")]
    Generation {
        /// What went wrong
        message: String,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON payload could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Formatting into a message buffer failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Required environment variable missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
