//! Session Discord commands - login, logout and theme.
//!
//! Login checks the configured credential list, opens a per-user session and
//! triggers a data load, the way the dashboard loaded its table right after the
//! login screen.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, render, session_key},
        core::auth::{LoginOutcome, Theme},
        errors::Result,
    };
    use poise::serenity_prelude as serenity;
    use tracing::warn;

    /// Logs in with a username and password from the credential list.
    #[poise::command(slash_command, ephemeral)]
    pub async fn login(
        ctx: Context<'_>,
        #[description = "Username"] username: String,
        #[description = "Password"] password: String,
    ) -> Result<()> {
        let data = ctx.data();
        let key = session_key(ctx);

        let outcome = data.sessions.login(&key, &username, &password).await?;
        if outcome == LoginOutcome::AlreadyLoggedIn {
            ctx.say("You are already logged in.").await?;
            return Ok(());
        }

        ctx.defer_ephemeral().await?;
        match data.dashboard.load(&data.source, &data.config).await {
            Ok(dataset) => {
                let summary = render::summary_text(
                    &dataset.summary(),
                    &dataset.periods,
                    &data.config.billing.currency,
                )?;
                ctx.say(format!("✅ Logged in. Data loaded.\n{summary}"))
                    .await?;
            }
            Err(e) => {
                warn!(error = %e, "Initial load after login failed");
                ctx.say(format!("✅ Logged in, but {e}")).await?;
            }
        }
        Ok(())
    }

    /// Logs out and clears your session.
    #[poise::command(slash_command, ephemeral)]
    pub async fn logout(ctx: Context<'_>) -> Result<()> {
        let removed = ctx.data().sessions.logout(&session_key(ctx)).await;
        let message = if removed {
            "👋 Logged out."
        } else {
            "You were not logged in."
        };
        ctx.say(message).await?;
        Ok(())
    }

    /// Toggles between light and dark embeds.
    #[poise::command(slash_command, ephemeral)]
    pub async fn theme(ctx: Context<'_>) -> Result<()> {
        let session = ctx
            .data()
            .sessions
            .update(&session_key(ctx), |s| s.theme = s.theme.toggled())
            .await?;

        let name = match session.theme {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        };
        let embed = serenity::CreateEmbed::new()
            .title(format!("{name} mode"))
            .colour(render::theme_colour(session.theme));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
