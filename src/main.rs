mod api;
mod config;
mod error;
mod homework;
mod notifier;
mod poller;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::PracticumClient;
use crate::config::Config;
use crate::notifier::TelegramNotifier;
use crate::poller::Poller;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hwbot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Pick up a local .env file when present
    dotenvy::dotenv().ok();

    // The only check allowed to kill the process; everything after this
    // point is recovered inside the poll loop.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            error!("Startup aborted");
            std::process::exit(1);
        }
    };

    let client = PracticumClient::new(&config.practicum_token);
    let notifier = TelegramNotifier::new(&config.telegram_token, &config.telegram_chat_id)
        .context("Failed to set up the Telegram notifier")?;

    info!("Bot is starting...");
    Poller::new(client, notifier).run().await;

    Ok(())
}
