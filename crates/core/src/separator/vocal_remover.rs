//! Runs the vocal-remover inference script.

use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use super::{SeparationError, StemPaths, StemSeparator};
use crate::config::SeparatorConfig;
use crate::metrics;
use crate::tool::{non_empty_file, run_tool, ToolCommand};

/// Invokes `python inference.py -i <audio> -o <dir>` from the model
/// directory.
pub struct VocalRemoverSeparator {
    config: SeparatorConfig,
}

impl VocalRemoverSeparator {
    pub fn new(config: SeparatorConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(SeparatorConfig::default())
    }

    fn build_command(&self, audio: &Path, out_dir: &Path) -> ToolCommand {
        ToolCommand::new(&self.config.python_path)
            .path_arg(&self.config.script_path)
            .arg("-i")
            .path_arg(audio)
            .arg("-o")
            .path_arg(out_dir)
            .args(self.config.extra_args.iter().cloned())
            .current_dir(&self.config.working_dir)
    }
}

#[async_trait]
impl StemSeparator for VocalRemoverSeparator {
    fn name(&self) -> &str {
        "vocal-remover"
    }

    async fn separate(
        &self,
        audio: &Path,
        out_dir: &Path,
    ) -> Result<StemPaths, SeparationError> {
        if non_empty_file(audio).await.is_none() {
            return Err(SeparationError::InputNotFound {
                path: audio.to_path_buf(),
            });
        }

        let command = self.build_command(audio, out_dir);
        let result = run_tool(&command).await;
        metrics::record_external_call("vocal-remover", "separate", result.is_ok());
        let output = result?;

        let stems = StemPaths::expected(audio, out_dir);
        for path in [&stems.instruments, &stems.vocals] {
            if non_empty_file(path).await.is_none() {
                return Err(SeparationError::MissingOutput { path: path.clone() });
            }
        }

        info!(
            "Separated {:?} in {:.1}s",
            audio.file_name().unwrap_or_default(),
            output.duration.as_secs_f64()
        );
        Ok(stems)
    }
}
