use std::{
    io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;
use tokio::fs;

use crate::session::SessionKey;

static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.?be)/.+$").expect("valid youtube regex")
});

pub fn is_valid_youtube_url(url: &str) -> bool {
    YOUTUBE_URL.is_match(url.trim())
}

/// Human readable size, e.g. `12.3 MB`
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// File name suffix owned by one download request
pub fn get_unique_file_id(key: &SessionKey, format_id: &str) -> String {
    let user = match key.user_id {
        Some(user_id) => format!("user{}", user_id.0),
        None => "anon".to_string(),
    };
    let format: String = format_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let nonce = &uuid::Uuid::new_v4().simple().to_string()[..8];

    format!("chat{}_{}_f{}_{}", key.chat_id.0, user, format, nonce)
}

pub fn get_output_format(download_dir: &Path, file_stem: &str, unique_id: &str) -> String {
    download_dir
        .join(format!("{}_{}.%(ext)s", file_stem, unique_id))
        .to_string_lossy()
        .into_owned()
}

/// Delete files in `dir` whose name contains `needle`, e.g. `.part` leftovers
pub async fn remove_matching(dir: &Path, needle: &str) -> io::Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(removed),
        Err(e) => return Err(e),
    };

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_name().to_string_lossy().contains(needle) && entry.file_type().await?.is_file()
        {
            fs::remove_file(entry.path()).await?;
            removed.push(entry.path());
        }
    }

    Ok(removed)
}

pub async fn clear_dir(dir: &Path) -> io::Result<()> {
    remove_matching(dir, "").await.map(|_| ())
}

#[cfg(test)]
pub fn test_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "tg-youtube-dl-{}-{}",
        name,
        uuid::Uuid::new_v4().simple()
    ))
}
