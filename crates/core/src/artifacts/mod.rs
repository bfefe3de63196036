//! Artifact naming and per-request working directories.
//!
//! Every file a pipeline run touches is named `{artist} - {title}` plus a
//! fixed suffix per role, so the paths for a track are known before any
//! stage runs.

mod naming;
mod workspace;

pub use naming::{sanitize_component, ArtifactSet};
pub use workspace::Workspace;

/// Container the video-only stream is downloaded into.
pub const VIDEO_EXT: &str = "mov";
/// Container the audio-only stream is downloaded into.
pub const AUDIO_EXT: &str = "webm";
/// Subtitle document returned by the aligner.
pub const SUBTITLE_EXT: &str = "ass";
/// Final muxed karaoke file.
pub const FINAL_EXT: &str = "mp4";
/// Waveform format the separator writes stems in.
pub const STEM_EXT: &str = "wav";
/// Suffix the separator appends for the vocals stem.
pub const VOCALS_SUFFIX: &str = "_Vocals";
/// Suffix the separator appends for the instruments stem.
pub const INSTRUMENTS_SUFFIX: &str = "_Instruments";
