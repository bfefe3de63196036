//! Vocal / instrument stem separation.
//!
//! The separation model is an external tool. This module only knows how to
//! invoke it and where it puts its output.

mod vocal_remover;

pub use vocal_remover::VocalRemoverSeparator;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::artifacts::{INSTRUMENTS_SUFFIX, STEM_EXT, VOCALS_SUFFIX};
use crate::tool::ToolError;

/// Errors that can occur during separation.
#[derive(Debug, Error)]
pub enum SeparationError {
    /// Separation tool failed.
    #[error("separation tool failed: {0}")]
    Tool(#[from] ToolError),

    /// Input audio is not there.
    #[error("input audio not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Tool exited cleanly but an expected stem is missing or empty.
    #[error("separation produced no stem at {path}")]
    MissingOutput { path: PathBuf },
}

/// Paths of the two stems produced from one audio file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StemPaths {
    pub instruments: PathBuf,
    pub vocals: PathBuf,
}

impl StemPaths {
    /// Where the separator writes stems for `audio` inside `out_dir`:
    /// `{stem}_Instruments.wav` and `{stem}_Vocals.wav`.
    pub fn expected(audio: &Path, out_dir: &Path) -> Self {
        let stem = audio
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            instruments: out_dir.join(format!("{}{}.{}", stem, INSTRUMENTS_SUFFIX, STEM_EXT)),
            vocals: out_dir.join(format!("{}{}.{}", stem, VOCALS_SUFFIX, STEM_EXT)),
        }
    }
}

/// Splits an audio file into vocals and instruments.
#[async_trait]
pub trait StemSeparator: Send + Sync {
    /// Returns the name of this separator.
    fn name(&self) -> &str;

    /// Separates `audio`, writing both stems into `out_dir`.
    ///
    /// Both returned paths exist and are non-empty when this returns `Ok`.
    async fn separate(&self, audio: &Path, out_dir: &Path)
        -> Result<StemPaths, SeparationError>;
}
