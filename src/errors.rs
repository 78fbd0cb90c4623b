use std::fmt;

/// Error type shared by the whole bot
#[derive(Debug)]
pub enum BotError {
    /// Text sent while waiting for a link is not a YouTube URL
    InvalidUrl(String),
    /// yt-dlp could not read the video information
    ExtractionError(String),
    /// The probe succeeded but nothing is in the supported container
    NoSupportedFormats,
    /// Reply does not match any offered format id
    InvalidFormatSelection(String),
    /// yt-dlp failed while downloading
    DownloadError(String),
    /// Telegram API errors
    TelegramError(teloxide::RequestError),
    /// Filesystem errors
    FileSystemError(std::io::Error),
    /// Malformed external output
    ParseError(String),
    /// External command could not run or exited with an error
    ExternalCommandError { command: String, stderr: String },
    /// Missing or malformed configuration
    Config(String),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::InvalidUrl(url) => write!(f, "Invalid YouTube URL: {}", url),
            BotError::ExtractionError(msg) => write!(f, "Extraction failed: {}", msg),
            BotError::NoSupportedFormats => write!(f, "No supported formats available"),
            BotError::InvalidFormatSelection(id) => write!(f, "Unknown format id: {}", id),
            BotError::DownloadError(msg) => write!(f, "Download failed: {}", msg),
            BotError::TelegramError(e) => write!(f, "Telegram API error: {}", e),
            BotError::FileSystemError(e) => write!(f, "Filesystem error: {}", e),
            BotError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            BotError::ExternalCommandError { command, stderr } => {
                write!(f, "Command {} failed: {}", command, stderr)
            }
            BotError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for BotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BotError::FileSystemError(e) => Some(e),
            BotError::TelegramError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BotError {
    fn from(err: std::io::Error) -> Self {
        BotError::FileSystemError(err)
    }
}

impl From<teloxide::RequestError> for BotError {
    fn from(err: teloxide::RequestError) -> Self {
        BotError::TelegramError(err)
    }
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        BotError::ParseError(format!("JSON parsing error: {}", err))
    }
}

impl BotError {
    pub fn extraction_error(msg: impl Into<String>) -> Self {
        Self::ExtractionError(msg.into())
    }

    pub fn download_error(msg: impl Into<String>) -> Self {
        Self::DownloadError(msg.into())
    }

    pub fn external_command_error(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::ExternalCommandError {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result of bot operations
pub type BotResult<T> = Result<T, BotError>;

/// Result for teloxide endpoints
pub type HandlerResult = BotResult<()>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_keeps_context() {
        let err = BotError::external_command_error("yt-dlp", "ERROR: Video unavailable");
        assert_eq!(err.to_string(), "Command yt-dlp failed: ERROR: Video unavailable");
    }

    #[test]
    fn io_errors_convert() {
        let err: BotError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, BotError::FileSystemError(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
