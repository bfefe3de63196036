use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::path::{Path, PathBuf};

use super::{
    AUDIO_EXT, FINAL_EXT, INSTRUMENTS_SUFFIX, STEM_EXT, SUBTITLE_EXT, VIDEO_EXT, VOCALS_SUFFIX,
};

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[/\\\x00-\x1F\x7F]").expect("static regex is valid"));

/// Replaces path separators and control characters with `_`.
pub fn sanitize_component(value: &str) -> String {
    UNSAFE_CHARS.replace_all(value.trim(), "_").into_owned()
}

/// File paths for every stage of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    /// `{artist} - {title}` after sanitizing.
    pub base_name: String,
    /// Directory every artifact lives in.
    pub dir: PathBuf,
    pub video: PathBuf,
    pub audio: PathBuf,
    pub subtitle: PathBuf,
    pub final_output: PathBuf,
    pub vocals_stem: PathBuf,
    pub instruments_stem: PathBuf,
}

impl ArtifactSet {
    /// Derives all paths for `(artist, title)` inside `dir`.
    pub fn derive(dir: &Path, artist: &str, title: &str) -> Self {
        let base_name = format!(
            "{} - {}",
            sanitize_component(artist),
            sanitize_component(title)
        );
        let file = |suffix: &str, ext: &str| dir.join(format!("{}{}.{}", base_name, suffix, ext));

        Self {
            video: file("", VIDEO_EXT),
            audio: file("", AUDIO_EXT),
            subtitle: file("", SUBTITLE_EXT),
            final_output: file("", FINAL_EXT),
            vocals_stem: file(VOCALS_SUFFIX, STEM_EXT),
            instruments_stem: file(INSTRUMENTS_SUFFIX, STEM_EXT),
            dir: dir.to_path_buf(),
            base_name,
        }
    }

    /// File name of the downloaded audio, sent along to the aligner.
    pub fn audio_file_name(&self) -> String {
        format!("{}.{}", self.base_name, AUDIO_EXT)
    }

    /// Files that must not survive a completed run.
    pub fn intermediates(&self) -> [&Path; 4] {
        [
            &self.video,
            &self.audio,
            &self.vocals_stem,
            &self.instruments_stem,
        ]
    }

    /// Files a completed run leaves behind.
    pub fn deliverables(&self) -> [&Path; 2] {
        [&self.final_output, &self.subtitle]
    }
}
