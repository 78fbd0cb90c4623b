pub mod catalog;
pub mod youtube;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::errors::BotResult;

pub use catalog::{Catalog, RawFormat, build_catalog};
pub use youtube::YtDlp;

/// Formats discovered by one probe of one URL
#[derive(Debug, Clone, Default)]
pub struct ProbeResult {
    pub title: Option<String>,
    pub formats: Vec<RawFormat>,
}

/// Extraction and download backend
#[async_trait]
pub trait MediaService: Send + Sync {
    /// Read the available formats without downloading the media
    async fn probe(&self, url: &str) -> BotResult<ProbeResult>;

    /// Download one format of `url`, returning the path of the written file
    async fn download(
        &self,
        url: &str,
        format_id: &str,
        output_template: &str,
    ) -> BotResult<PathBuf>;
}
