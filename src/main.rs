mod api;
mod config;
mod constants;
mod error;
mod handlers;
mod models;
mod notifier;
mod schedule;
mod timetable;

use std::sync::Arc;

use serenity::all::GatewayIntents;
use tracing::{error, info};

use crate::api::AppState;
use crate::config::BotConfig;
use crate::constants::{DEFAULT_PORT, LOG_DIRECTIVE};
use crate::handlers::BotHandler;
use crate::models::Data;
use crate::notifier::{DiscordMessenger, Notifier};
use crate::schedule::ScheduleManager;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    initialize_logging();

    // Load configuration from environment
    let config = match load_configuration() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    let port = config.port;

    // Wire up shared state, the messaging seam and the scheduler
    let data = Arc::new(Data::new(config.bot));
    let messenger = Arc::new(DiscordMessenger::new());
    let notifier = Arc::new(Notifier::new(messenger.clone(), Arc::clone(&data)));
    let manager = ScheduleManager::new(Arc::clone(&data), Arc::clone(&notifier));

    // Start the HTTP control surface
    let state = AppState {
        data,
        notifier: Arc::clone(&notifier),
        manager: Arc::clone(&manager),
    };
    tokio::spawn(async move {
        if let Err(e) = api::serve(port, state).await {
            error!("HTTP server error: {}", e);
        }
    });

    // Create and start the bot
    if let Err(e) = start_bot(config.discord_token, messenger, notifier, manager).await {
        error!("Bot error: {}", e);
        std::process::exit(1);
    }
}

/// Configuration loaded from environment variables
struct Config {
    discord_token: String,
    port: u16,
    bot: BotConfig,
}

/// Initialize the logging system
fn initialize_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(LOG_DIRECTIVE.parse().expect("valid log directive")),
        )
        .init();
}

/// Load configuration from environment variables
fn load_configuration() -> Result<Config, Box<dyn std::error::Error>> {
    let discord_token = std::env::var("DISCORD_TOKEN")
        .map_err(|_| "DISCORD_TOKEN environment variable not set. Set it with: export DISCORD_TOKEN=your_bot_token")?;

    let port = match std::env::var("PORT") {
        Ok(raw) => raw
            .parse::<u16>()
            .map_err(|_| format!("PORT must be a number, got '{}'", raw))?,
        Err(_) => DEFAULT_PORT,
    };

    let bot = BotConfig::from_env()?;
    info!(
        "Configured to notify {} {} minute(s) before class ends ({})",
        bot.recipient, bot.lead_minutes, bot.timezone
    );

    Ok(Config {
        discord_token,
        port,
        bot,
    })
}

/// Create and start the Discord client, shutting down cleanly on ctrl-c
async fn start_bot(
    token: String,
    messenger: Arc<DiscordMessenger>,
    notifier: Arc<Notifier>,
    manager: Arc<ScheduleManager>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let handler = BotHandler {
        messenger,
        notifier,
        manager: Arc::clone(&manager),
    };

    let intents = GatewayIntents::non_privileged();
    let mut client = serenity::Client::builder(&token, intents)
        .event_handler(handler)
        .await?;

    // Clear armed timers and close the gateway session on ctrl-c
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutting down...");
            manager.clear_armed();
            shard_manager.shutdown_all().await;
        }
    });

    info!("Starting bot...");
    client.start().await?;

    Ok(())
}
