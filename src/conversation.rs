//! Conversation state machine.
//!
//! Every operation returns the reply to send instead of talking to Telegram,
//! so the flow can be driven directly in tests.

use std::{path::PathBuf, sync::Arc};

use log::{error, info, warn};

use crate::{
    errors::BotError,
    session::{SessionKey, SessionStore, Step},
    utils::{get_output_format, get_unique_file_id, is_valid_youtube_url, remove_matching},
    video::{MediaService, build_catalog},
};

pub const WELCOME_TEXT: &str =
    "Welcome to the YouTube video downloading bot!\nUse /help to see available commands.";
pub const HELP_TEXT: &str = "/help - Show this help message\n\
                             /youtube - Start the video download process\n\
                             /cancel - Cancel the current download request";
pub const LINK_PROMPT: &str = "Please provide the YouTube video URL.";
pub const INVALID_URL: &str = "Invalid YouTube URL. Please provide a valid URL.";
pub const PROBE_FAILED: &str =
    "Failed to retrieve video information. Please check the URL and try again.";
pub const NO_SUPPORTED_FORMATS: &str = "No MP4 formats available for this video.";
pub const INVALID_FORMAT: &str = "Invalid format ID. Please try again.";
pub const DOWNLOAD_SUCCEEDED: &str = "Video downloaded successfully!";
pub const DOWNLOAD_FAILED: &str =
    "Failed to download the video. Please check the URL and try again.";
pub const CANCELLED: &str = "Download request cancelled.";
pub const NOTHING_TO_CANCEL: &str = "Nothing to cancel.";

/// Text to send back, optionally with a downloaded video to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub video: Option<PathBuf>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            video: None,
        }
    }
}

pub struct Conversation {
    store: SessionStore,
    media: Arc<dyn MediaService>,
    download_dir: PathBuf,
    file_stem: String,
    deliver_files: bool,
}

impl Conversation {
    pub fn new(
        store: SessionStore,
        media: Arc<dyn MediaService>,
        download_dir: impl Into<PathBuf>,
        file_stem: impl Into<String>,
        deliver_files: bool,
    ) -> Self {
        Self {
            store,
            media,
            download_dir: download_dir.into(),
            file_stem: file_stem.into(),
            deliver_files,
        }
    }

    pub fn start(&self) -> Reply {
        Reply::text(WELCOME_TEXT)
    }

    pub fn help(&self) -> Reply {
        Reply::text(HELP_TEXT)
    }

    /// Begin a new request, dropping whatever the user was doing before
    pub async fn begin(&self, key: SessionKey) -> Reply {
        info!("{:?} started a download request", key);
        self.store.set_step(key, Step::AwaitingLink).await;
        Reply::text(LINK_PROMPT)
    }

    pub async fn cancel(&self, key: SessionKey) -> Reply {
        if self.store.get(key).await.is_idle() {
            return Reply::text(NOTHING_TO_CANCEL);
        }
        self.store.reset(key).await;
        Reply::text(CANCELLED)
    }

    /// Route free text by the user's current step. `None` means the text is ignored.
    pub async fn handle_text(&self, key: SessionKey, text: &str) -> Option<Reply> {
        let session = self.store.get(key).await;
        match session.step {
            Step::Idle => None,
            Step::AwaitingLink => Some(self.link_received(key, text.trim()).await),
            Step::AwaitingFormat { url, catalog } => {
                let format_id = text.trim();
                if !catalog.contains(format_id) {
                    warn!(
                        "{:?}: {}",
                        key,
                        BotError::InvalidFormatSelection(format_id.to_string())
                    );
                    return Some(Reply::text(INVALID_FORMAT));
                }
                Some(self.format_received(key, &url, format_id).await)
            }
        }
    }

    async fn link_received(&self, key: SessionKey, url: &str) -> Reply {
        if !is_valid_youtube_url(url) {
            warn!("{:?}: {}", key, BotError::InvalidUrl(url.to_string()));
            return Reply::text(INVALID_URL);
        }

        let probe = match self.media.probe(url).await {
            Ok(probe) => probe,
            Err(e) => {
                error!("Error extracting video information for {}: {}", url, e);
                return Reply::text(PROBE_FAILED);
            }
        };

        let catalog = match build_catalog(&probe.formats) {
            Ok(catalog) => catalog.with_title(probe.title),
            Err(e) => {
                warn!("{}: {}", url, e);
                return Reply::text(NO_SUPPORTED_FORMATS);
            }
        };

        let text = catalog.render();
        info!("{:?} offered {} formats for {}", key, catalog.len(), url);
        self.store
            .set_step(
                key,
                Step::AwaitingFormat {
                    url: url.to_string(),
                    catalog,
                },
            )
            .await;
        Reply::text(text)
    }

    async fn format_received(&self, key: SessionKey, url: &str, format_id: &str) -> Reply {
        let unique_id = get_unique_file_id(&key, format_id);
        let output_template = get_output_format(&self.download_dir, &self.file_stem, &unique_id);

        let result = self.media.download(url, format_id, &output_template).await;
        self.store.reset(key).await;

        match result {
            Ok(path) => {
                info!("{:?} downloaded {} as {}", key, url, path.display());
                Reply {
                    text: DOWNLOAD_SUCCEEDED.to_string(),
                    video: self.deliver_files.then_some(path),
                }
            }
            Err(e) => {
                error!("Error downloading {} (format {}): {}", url, format_id, e);
                match remove_matching(&self.download_dir, &unique_id).await {
                    Ok(removed) if !removed.is_empty() => {
                        info!("Removed {} partial files of {}", removed.len(), unique_id)
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Failed to remove partial files of {}: {}", unique_id, e),
                }
                Reply::text(DOWNLOAD_FAILED)
            }
        }
    }
}
