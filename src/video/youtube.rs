use std::path::PathBuf;

use async_trait::async_trait;
use log::info;
use serde::Deserialize;
use tokio::process;

use crate::{
    errors::{BotError, BotResult},
    video::{MediaService, ProbeResult, RawFormat},
};

#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    title: Option<String>,
    #[serde(default)]
    formats: Vec<RawFormat>,
}

/// [`MediaService`] backed by the `yt-dlp` executable
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: String,
}

impl YtDlp {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self) -> process::Command {
        let mut cmd = process::Command::new(&self.program);
        cmd.arg("--no-playlist")
            .args(["--socket-timeout", "5"]);
        cmd
    }
}

/// Parse the JSON printed by `yt-dlp -J`
fn parse_probe_output(stdout: &str) -> BotResult<ProbeResult> {
    let info: YtDlpInfo = serde_json::from_str(stdout)
        .map_err(|e| BotError::ParseError(format!("Failed to parse yt-dlp output: {}", e)))?;

    Ok(ProbeResult {
        title: info.title,
        formats: info.formats,
    })
}

/// Last non-empty stdout line, which `--print after_move:filepath` emits
fn downloaded_path(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .map(PathBuf::from)
}

#[async_trait]
impl MediaService for YtDlp {
    async fn probe(&self, url: &str) -> BotResult<ProbeResult> {
        let output = self
            .command()
            .arg("-J")
            .arg(url)
            .output()
            .await
            .map_err(|e| BotError::external_command_error(&self.program, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(BotError::extraction_error(stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let probe = parse_probe_output(&stdout)?;
        info!("Probed {}: {} formats", url, probe.formats.len());
        Ok(probe)
    }

    async fn download(
        &self,
        url: &str,
        format_id: &str,
        output_template: &str,
    ) -> BotResult<PathBuf> {
        info!("Starting download: {} (format: {})", url, format_id);

        let output = self
            .command()
            .args(["-f", format_id])
            .args(["-o", output_template])
            .args(["--no-simulate", "--print", "after_move:filepath"])
            .arg(url)
            .output()
            .await
            .map_err(|e| BotError::external_command_error(&self.program, e.to_string()))?;

        info!("yt-dlp exit code: {:?}", output.status.code());

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(BotError::download_error(stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let path = downloaded_path(&stdout)
            .ok_or_else(|| BotError::download_error("yt-dlp did not report the output file"))?;
        info!("Download successful: {}", path.display());
        Ok(path)
    }
}
