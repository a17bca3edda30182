use collection_buddy::{
    bot::{self, BotData},
    config,
    core::{
        auth::{CredentialStore, SessionStore},
        compose::TextGenerator,
        sheet::GvizClient,
    },
    errors::{Error, Result},
};
use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!(
        users = app_config.users.len(),
        spreadsheet = %app_config.sheets.spreadsheet_id,
        "Configuration loaded"
    );

    // 4. Build the collaborators injected into the bot
    let source = GvizClient::new(
        &app_config.sheets.base_url,
        &app_config.sheets.spreadsheet_id,
    )?;
    let generator = TextGenerator::from_config(&app_config.compose)?;
    if generator.is_some() {
        info!("Reminder text generation enabled");
    }
    let sessions = SessionStore::new(CredentialStore::new(app_config.users.clone()));
    let data = BotData::new(Arc::new(app_config), sessions, source, generator);

    // 5. Run the bot
    // DISCORD_BOT_TOKEN is loaded here, directly before use, not stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, data).await
}
