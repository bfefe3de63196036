//! yt-dlp based fetcher.

use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use super::{FetchError, MediaFetcher, StreamKind};
use crate::config::FetcherConfig;
use crate::metrics;
use crate::tool::{non_empty_file, run_tool, ToolCommand};

/// Downloads streams by shelling out to `yt-dlp`.
pub struct YtDlpFetcher {
    config: FetcherConfig,
}

impl YtDlpFetcher {
    pub fn new(config: FetcherConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FetcherConfig::default())
    }

    fn build_command(&self, locator: &str, kind: StreamKind, dest: &Path) -> ToolCommand {
        let format = match kind {
            StreamKind::VideoOnly => &self.config.video_format,
            StreamKind::AudioOnly => &self.config.audio_format,
        };

        ToolCommand::new(&self.config.ytdlp_path)
            .args(["-f", format.as_str()])
            .args(["--no-playlist", "--force-overwrites", "--no-part", "--quiet"])
            .args(self.config.extra_args.iter().cloned())
            .arg("-o")
            .path_arg(dest)
            .arg("--")
            .arg(locator)
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn fetch(
        &self,
        locator: &str,
        kind: StreamKind,
        dest: &Path,
    ) -> Result<u64, FetchError> {
        let command = self.build_command(locator, kind, dest);
        let result = run_tool(&command).await;
        metrics::record_external_call("yt-dlp", &kind.to_string(), result.is_ok());
        result?;

        let bytes = non_empty_file(dest)
            .await
            .ok_or_else(|| FetchError::EmptyOutput {
                path: dest.to_path_buf(),
            })?;

        info!("Downloaded {} stream ({} bytes) to {:?}", kind, bytes, dest);
        Ok(bytes)
    }
}
