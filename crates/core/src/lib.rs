pub mod aligner;
pub mod artifacts;
pub mod catalog;
pub mod config;
pub mod events;
pub mod fetcher;
pub mod lyrics;
pub mod metrics;
pub mod muxer;
pub mod pipeline;
pub mod separator;
pub mod testing;
pub mod tool;

pub use aligner::{AlignmentError, HttpAligner, LyricsAligner};
pub use artifacts::{sanitize_component, ArtifactSet, Workspace};
pub use catalog::{CatalogError, GeniusClient, SongId, TrackCatalog, TrackMetadata};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use events::{create_event_system, EventHandle, EventLogger, PipelineEvent};
pub use fetcher::{FetchError, MediaFetcher, StreamKind, YtDlpFetcher};
pub use lyrics::{fetch_lyrics, LyricsError, LyricsOvhClient, LyricsSource};
pub use muxer::{FfmpegMuxer, MediaMuxer, MuxError, MuxJob};
pub use pipeline::{
    FailureKind, KaraokePipeline, PipelineComponents, PipelineOutcome, PipelineStage,
    SongRequest, StageFailure,
};
pub use separator::{SeparationError, StemPaths, StemSeparator, VocalRemoverSeparator};
