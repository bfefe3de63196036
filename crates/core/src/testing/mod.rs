//! Testing utilities and mock implementations.
//!
//! Every external collaborator of the pipeline has a mock here, so the
//! whole pipeline (and the server on top of it) can be exercised without
//! network access or media tools.
//!
//! # Example
//!
//! ```rust,ignore
//! use karaokify_core::testing::{fixtures, MockSuite};
//!
//! let mocks = MockSuite::new();
//! mocks.catalog.add_track(12345, fixtures::track("A", "B")).await;
//! mocks.lyrics.set_default_lyrics("la la la").await;
//!
//! let pipeline = KaraokePipeline::new(fixtures::config(dir), mocks.components());
//! let outcome = pipeline.process_song(12345).await;
//! ```

mod mock_aligner;
mod mock_catalog;
mod mock_fetcher;
mod mock_lyrics;
mod mock_muxer;
mod mock_separator;

pub use mock_aligner::{MockAligner, RecordedAlignment, MOCK_SUBTITLE};
pub use mock_catalog::MockCatalog;
pub use mock_fetcher::{MockFetcher, RecordedFetch};
pub use mock_lyrics::MockLyricsSource;
pub use mock_muxer::MockMuxer;
pub use mock_separator::MockSeparator;

use std::sync::Arc;

use crate::pipeline::PipelineComponents;

/// One mock per pipeline collaborator, kept so tests can configure and
/// inspect them after handing them to a pipeline.
#[derive(Clone, Default)]
pub struct MockSuite {
    pub catalog: Arc<MockCatalog>,
    pub lyrics: Arc<MockLyricsSource>,
    pub fetcher: Arc<MockFetcher>,
    pub separator: Arc<MockSeparator>,
    pub muxer: Arc<MockMuxer>,
    pub aligner: Arc<MockAligner>,
}

impl MockSuite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Components backed by these mocks.
    pub fn components(&self) -> PipelineComponents {
        PipelineComponents {
            catalog: self.catalog.clone(),
            lyrics: self.lyrics.clone(),
            fetcher: self.fetcher.clone(),
            separator: self.separator.clone(),
            muxer: self.muxer.clone(),
            aligner: self.aligner.clone(),
        }
    }

    /// Number of subprocess-backed operations performed (downloads,
    /// separations and muxes).
    pub async fn tool_invocations(&self) -> usize {
        self.fetcher.fetch_count().await
            + self.separator.call_count().await
            + self.muxer.call_count().await
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::Path;
    use std::time::Duration;

    use crate::catalog::TrackMetadata;
    use crate::config::{Config, StageTimeouts};

    /// Source link used by [`track`].
    pub const SOURCE_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    /// Lyrics with LF line endings.
    pub const LYRICS: &str = "First line\nSecond line\n\nChorus line";

    /// A track with a playable source.
    pub fn track(artist: &str, title: &str) -> TrackMetadata {
        TrackMetadata {
            artist: artist.to_string(),
            title: title.to_string(),
            source_locator: Some(SOURCE_URL.to_string()),
        }
    }

    /// A track the catalog lists without a playable source.
    pub fn track_without_source(artist: &str, title: &str) -> TrackMetadata {
        TrackMetadata {
            source_locator: None,
            ..track(artist, title)
        }
    }

    /// Default config writing into `output_dir`, with isolated requests.
    pub fn config(output_dir: &Path) -> Config {
        let mut config = Config::default();
        config.output.dir = output_dir.to_path_buf();
        config.output.isolate_requests = true;
        config.catalog.api_key = "test-api-key".to_string();
        config
    }

    /// Like [`config`], with every artifact in `output_dir` itself.
    pub fn shared_config(output_dir: &Path) -> Config {
        let mut config = config(output_dir);
        config.output.isolate_requests = false;
        config
    }

    /// Like [`config`], with every stage bounded by `timeout`.
    pub fn config_with_timeout(output_dir: &Path, timeout: Duration) -> Config {
        let mut config = config(output_dir);
        config.timeouts = StageTimeouts::uniform(timeout);
        config
    }
}
