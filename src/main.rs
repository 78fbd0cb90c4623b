mod commands;
mod config;
mod conversation;
mod errors;
mod handlers;
mod schema;
mod session;
mod temp_file;
mod utils;
mod video;

use std::{sync::Arc, time::Duration};

use teloxide::{prelude::*, utils::command::BotCommands};

use crate::{
    config::Config,
    conversation::Conversation,
    schema::{Command, schema},
    session::SessionStore,
    utils::clear_dir,
    video::{MediaService, YtDlp},
};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

fn init_logging() {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&filters)
        .init();
}

fn spawn_session_sweeper(store: SessionStore) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let evicted = store.purge_expired().await;
            if evicted > 0 {
                log::info!(
                    "Evicted {} expired sessions, {} active",
                    evicted,
                    store.len().await
                );
            }
        }
    });
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_logging();
    log::info!("Starting YouTube download bot...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    log::info!("Loaded {:?}", config);

    let bot = Bot::new(&config.bot_token);
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    if let Err(e) = tokio::fs::create_dir_all(&config.download_dir).await {
        log::error!(
            "Cannot create download directory {}: {}",
            config.download_dir.display(),
            e
        );
        std::process::exit(1);
    }

    let store = SessionStore::new(config.session_ttl);
    spawn_session_sweeper(store.clone());

    let media: Arc<dyn MediaService> = Arc::new(YtDlp::new(&config.ytdlp_path));
    let conversation = Arc::new(Conversation::new(
        store,
        media,
        config.download_dir.clone(),
        config.file_stem.clone(),
        config.deliver_files,
    ));

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![conversation])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    // delivered files are removed after upload, anything left is from interrupted requests
    if config.deliver_files {
        if let Err(e) = clear_dir(&config.download_dir).await {
            log::warn!("Failed to clear {}: {}", config.download_dir.display(), e);
        }
    }
}
