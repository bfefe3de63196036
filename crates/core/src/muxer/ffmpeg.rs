//! FFmpeg-based muxer.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use super::{MediaMuxer, MuxError, MuxJob, TRACK_TITLES};
use crate::config::MuxerConfig;
use crate::metrics;
use crate::tool::{non_empty_file, run_tool, ToolCommand};

/// Muxes with a single ffmpeg invocation. The video stream is copied, the
/// three audio inputs are re-encoded with the configured codec.
pub struct FfmpegMuxer {
    config: MuxerConfig,
}

impl FfmpegMuxer {
    pub fn new(config: MuxerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(MuxerConfig::default())
    }

    /// Builds the ffmpeg command line for `job`.
    pub fn build_command(&self, job: &MuxJob) -> ToolCommand {
        let mut cmd = ToolCommand::new(&self.config.ffmpeg_path);

        for input in job.inputs() {
            cmd = cmd.arg("-i").path_arg(input);
        }

        cmd = cmd.args(["-map", "0:v", "-map", "1:a", "-map", "2:a", "-map", "3:a"]);
        // Drop source metadata so the players show our track names.
        cmd = cmd.args(["-map_metadata", "-1"]);
        for (index, title) in TRACK_TITLES.iter().enumerate() {
            cmd = cmd
                .arg(format!("-metadata:s:a:{}", index))
                .arg(format!("title={}", title));
        }

        cmd.args(["-c:v", "copy"])
            .arg("-c:a")
            .arg(self.config.audio_codec.as_str())
            .arg("-loglevel")
            .arg(self.config.log_level.as_str())
            .arg("-y")
            .path_arg(&job.output)
    }
}

#[async_trait]
impl MediaMuxer for FfmpegMuxer {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn mux(&self, job: &MuxJob) -> Result<PathBuf, MuxError> {
        for input in job.inputs() {
            if non_empty_file(input).await.is_none() {
                return Err(MuxError::InputNotFound {
                    path: input.clone(),
                });
            }
        }

        let command = self.build_command(job);
        let result = run_tool(&command).await;
        metrics::record_external_call("ffmpeg", "mux", result.is_ok());
        let output = result?;

        let size = non_empty_file(&job.output)
            .await
            .ok_or_else(|| MuxError::MissingOutput {
                path: job.output.clone(),
            })?;

        info!(
            "Muxed {:?} ({} bytes) in {:.1}s",
            job.output.file_name().unwrap_or_default(),
            size,
            output.duration.as_secs_f64()
        );
        Ok(job.output.clone())
    }
}
