//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require a session
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{bot::Context, errors::Result};

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**CollectionBuddy Help**\n\
        Payment status for the last three months, straight from the billing sheets.\n\n\
        **Session**\n\
        • `/login <username> <password>` - Opens your session and loads the data.\n\
        • `/logout` - Closes your session.\n\
        • `/theme` - Toggles light/dark embeds.\n\n\
        **Table**\n\
        • `/load` - Re-fetches all three sheets.\n\
        • `/summary` - No-payment counts per month.\n\
        • `/table` - Shows the current page of the filtered table.\n\
        • `/page <number>` - Jumps to a page.\n\
        • `/filter [months] [area] [due]` - Sets the filters (omitted = All).\n\
        • `/search [text]` - Searches id, name, phone and area (empty clears).\n\
        • `/details <customer>` - Shows one customer.\n\n\
        **Reminders**\n\
        • `/remind <customer>` - WhatsApp reminder link for one customer.\n\
        • `/remind_all` - Links for every customer on the current page.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
