use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub lyrics: LyricsConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub separator: SeparatorConfig,
    #[serde(default)]
    pub muxer: MuxerConfig,
    #[serde(default)]
    pub aligner: AlignerConfig,
    #[serde(default)]
    pub timeouts: StageTimeouts,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Where finished karaoke files land.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Library directory for final outputs and subtitles.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Run each request in its own working directory under `{dir}/.work`.
    /// When false, every intermediate file lives flat in `dir` and two
    /// requests for the same track share paths.
    #[serde(default = "default_true")]
    pub isolate_requests: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            isolate_requests: true,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("/media/karaoke")
}

fn default_true() -> bool {
    true
}

/// Genius catalog configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub base_url: String,
    /// Bearer token. Empty means every lookup is rejected with 401.
    #[serde(default)]
    pub api_key: String,
    /// Media provider whose link is used as the download source.
    #[serde(default = "default_source_provider")]
    pub source_provider: String,
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
            api_key: String::new(),
            source_provider: default_source_provider(),
            timeout_secs: default_http_timeout(),
        }
    }
}

fn default_catalog_url() -> String {
    "https://api.genius.com".to_string()
}

fn default_source_provider() -> String {
    "youtube".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

/// Lyrics lookup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LyricsConfig {
    #[serde(default = "default_lyrics_url")]
    pub base_url: String,
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            base_url: default_lyrics_url(),
            timeout_secs: default_http_timeout(),
        }
    }
}

fn default_lyrics_url() -> String {
    "https://api.lyrics.ovh".to_string()
}

/// yt-dlp configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetcherConfig {
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,
    /// Format selector for the video-only stream.
    #[serde(default = "default_video_format")]
    pub video_format: String,
    /// Format selector for the audio-only stream.
    #[serde(default = "default_audio_format")]
    pub audio_format: String,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: default_ytdlp_path(),
            video_format: default_video_format(),
            audio_format: default_audio_format(),
            extra_args: Vec::new(),
        }
    }
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_video_format() -> String {
    "bestvideo".to_string()
}

fn default_audio_format() -> String {
    "bestaudio".to_string()
}

/// Vocal remover configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeparatorConfig {
    #[serde(default = "default_python_path")]
    pub python_path: PathBuf,
    #[serde(default = "default_script_path")]
    pub script_path: PathBuf,
    /// The inference script loads its model relative to this directory.
    #[serde(default = "default_separator_workdir")]
    pub working_dir: PathBuf,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for SeparatorConfig {
    fn default() -> Self {
        Self {
            python_path: default_python_path(),
            script_path: default_script_path(),
            working_dir: default_separator_workdir(),
            extra_args: Vec::new(),
        }
    }
}

fn default_python_path() -> PathBuf {
    PathBuf::from("python")
}

fn default_script_path() -> PathBuf {
    PathBuf::from("/vocal-remover/inference.py")
}

fn default_separator_workdir() -> PathBuf {
    PathBuf::from("/vocal-remover")
}

/// FFmpeg muxer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MuxerConfig {
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,
    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for MuxerConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            audio_codec: default_audio_codec(),
            log_level: default_log_level(),
        }
    }
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_log_level() -> String {
    "error".to_string()
}

/// Alignment service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlignerConfig {
    #[serde(default = "default_aligner_url")]
    pub base_url: String,
    /// Subtitle format requested from the service.
    #[serde(default = "default_subtitle_format")]
    pub format: String,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            base_url: default_aligner_url(),
            format: default_subtitle_format(),
        }
    }
}

fn default_aligner_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_subtitle_format() -> String {
    "ass".to_string()
}

/// Per-stage deadlines in seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StageTimeouts {
    #[serde(default = "default_metadata_timeout")]
    pub metadata_secs: u64,
    #[serde(default = "default_lyrics_timeout")]
    pub lyrics_secs: u64,
    #[serde(default = "default_download_timeout")]
    pub download_secs: u64,
    #[serde(default = "default_separation_timeout")]
    pub separation_secs: u64,
    #[serde(default = "default_mux_timeout")]
    pub mux_secs: u64,
    #[serde(default = "default_alignment_timeout")]
    pub alignment_secs: u64,
}

fn default_metadata_timeout() -> u64 {
    30
}

fn default_lyrics_timeout() -> u64 {
    30
}

fn default_download_timeout() -> u64 {
    1800 // 30 minutes
}

fn default_separation_timeout() -> u64 {
    3600 // 1 hour
}

fn default_mux_timeout() -> u64 {
    1800
}

fn default_alignment_timeout() -> u64 {
    1800
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self {
            metadata_secs: default_metadata_timeout(),
            lyrics_secs: default_lyrics_timeout(),
            download_secs: default_download_timeout(),
            separation_secs: default_separation_timeout(),
            mux_secs: default_mux_timeout(),
            alignment_secs: default_alignment_timeout(),
        }
    }
}

impl StageTimeouts {
    /// Every stage gets the same deadline. Mostly useful in tests.
    pub fn uniform(duration: Duration) -> Self {
        let secs = duration.as_secs().max(1);
        Self {
            metadata_secs: secs,
            lyrics_secs: secs,
            download_secs: secs,
            separation_secs: secs,
            mux_secs: secs,
            alignment_secs: secs,
        }
    }

    pub(crate) fn all(&self) -> [(&'static str, u64); 6] {
        [
            ("metadata_secs", self.metadata_secs),
            ("lyrics_secs", self.lyrics_secs),
            ("download_secs", self.download_secs),
            ("separation_secs", self.separation_secs),
            ("mux_secs", self.mux_secs),
            ("alignment_secs", self.alignment_secs),
        ]
    }
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub output: OutputConfig,
    pub catalog: SanitizedCatalogConfig,
    pub lyrics: LyricsConfig,
    pub fetcher: FetcherConfig,
    pub separator: SeparatorConfig,
    pub muxer: MuxerConfig,
    pub aligner: AlignerConfig,
    pub timeouts: StageTimeouts,
}

/// Catalog config with the API key hidden
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub source_provider: String,
    pub timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            output: config.output.clone(),
            catalog: SanitizedCatalogConfig {
                base_url: config.catalog.base_url.clone(),
                api_key_configured: !config.catalog.api_key.is_empty(),
                source_provider: config.catalog.source_provider.clone(),
                timeout_secs: config.catalog.timeout_secs,
            },
            lyrics: config.lyrics.clone(),
            fetcher: config.fetcher.clone(),
            separator: config.separator.clone(),
            muxer: config.muxer.clone(),
            aligner: config.aligner.clone(),
            timeouts: config.timeouts.clone(),
        }
    }
}
