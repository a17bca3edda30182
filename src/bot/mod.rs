//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the chat interface for the collection dashboard: login gate,
//! table paging, filters, details and reminder links, all as slash commands.

/// Discord command implementations (general, session, table, reminder)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;
/// Plain-text and embed rendering of dashboard views
pub mod render;

use crate::{
    config::AppConfig,
    core::{
        auth::{Session, SessionStore},
        compose::TextGenerator,
        dashboard::Dashboard,
        sheet::GvizClient,
    },
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Poise context carrying [`BotData`].
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Shared data available to all bot commands.
/// This structure holds the configuration, sessions, loaded dataset and the
/// clients used to reach the spreadsheet and the optional text generator.
pub struct BotData {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Logged-in users and their view state
    pub sessions: SessionStore,
    /// Most recently loaded dataset
    pub dashboard: Dashboard,
    /// Spreadsheet client
    pub source: GvizClient,
    /// Text generator for reminder wording, when configured
    pub generator: Option<TextGenerator>,
}

impl BotData {
    /// Creates a new `BotData` instance with the given collaborators.
    #[must_use]
    pub fn new(
        config: Arc<AppConfig>,
        sessions: SessionStore,
        source: GvizClient,
        generator: Option<TextGenerator>,
    ) -> Self {
        Self {
            config,
            sessions,
            dashboard: Dashboard::new(),
            source,
            generator,
        }
    }
}

/// Session key for the invoking user.
#[must_use]
pub fn session_key(ctx: Context<'_>) -> String {
    ctx.author().id.to_string()
}

/// Returns the caller's session or `Error::NotLoggedIn`.
pub async fn require_session(ctx: Context<'_>) -> Result<Session> {
    ctx.data().sessions.session(&session_key(ctx)).await
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            let reply = poise::CreateReply::default()
                .content(format!("⚠️ {error}"))
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Starts the bot and blocks until the gateway connection ends.
#[instrument(skip_all)]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}
