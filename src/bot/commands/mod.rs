//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

use crate::{bot::BotData, errors::Error};

/// General utility commands
pub mod general;

/// Reminder link commands
pub mod reminder;

/// Login, logout and theme commands
pub mod session;

/// Table, filter and detail commands
pub mod table;

// Export commands
pub use general::*;
pub use reminder::*;
pub use session::*;
pub use table::*;

/// Every command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        ping(),
        help(),
        login(),
        logout(),
        theme(),
        load(),
        summary(),
        table(),
        page(),
        filter(),
        search(),
        details(),
        remind(),
        remind_all(),
    ]
}
