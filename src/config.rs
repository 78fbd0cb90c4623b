//! Runtime configuration read from the process environment.
//! A `.env` file is loaded by `main` before this runs.

use std::path::PathBuf;

use chrono::TimeDelta;

use crate::errors::{BotError, BotResult};

const DEFAULT_DOWNLOAD_DIR: &str = "downloads";
const DEFAULT_FILE_STEM: &str = "%(id)s";
const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;
const DEFAULT_YTDLP_PATH: &str = "yt-dlp";

#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub download_dir: PathBuf,
    /// yt-dlp template for the file name, without directory or extension
    pub file_stem: String,
    pub session_ttl: TimeDelta,
    pub deliver_files: bool,
    pub ytdlp_path: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("download_dir", &self.download_dir)
            .field("file_stem", &self.file_stem)
            .field("session_ttl", &self.session_ttl)
            .field("deliver_files", &self.deliver_files)
            .field("ytdlp_path", &self.ytdlp_path)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> BotResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BotResult<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = var("TELEGRAM_BOT_TOKEN")
            .or_else(|| var("TELOXIDE_TOKEN"))
            .ok_or_else(|| {
                BotError::config("TELEGRAM_BOT_TOKEN is not set. Please check your .env file.")
            })?;

        let session_ttl = match var("SESSION_TTL_MINUTES") {
            Some(raw) => {
                let minutes = raw.parse::<i64>().ok().filter(|m| *m > 0).ok_or_else(|| {
                    BotError::config(format!(
                        "SESSION_TTL_MINUTES must be a positive integer, got '{}'",
                        raw
                    ))
                })?;
                TimeDelta::try_minutes(minutes).ok_or_else(|| {
                    BotError::config(format!("SESSION_TTL_MINUTES is out of range: {}", minutes))
                })?
            }
            None => TimeDelta::minutes(DEFAULT_SESSION_TTL_MINUTES),
        };

        let deliver_files = match var("DELIVER_FILES") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                BotError::config(format!("DELIVER_FILES must be true or false, got '{}'", raw))
            })?,
            None => true,
        };

        Ok(Self {
            bot_token,
            download_dir: var("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_DIR)),
            file_stem: var("OUTPUT_TEMPLATE").unwrap_or_else(|| DEFAULT_FILE_STEM.to_string()),
            session_ttl,
            deliver_files,
            ytdlp_path: var("YTDLP_PATH").unwrap_or_else(|| DEFAULT_YTDLP_PATH.to_string()),
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
