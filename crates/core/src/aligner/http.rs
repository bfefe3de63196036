//! Multipart client for the alignment service.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use super::{AlignmentError, LyricsAligner};
use crate::config::AlignerConfig;
use crate::metrics;

/// Posts `{lyrics, format, audio_file}` to `{base}/align`.
///
/// No client-side timeout: alignment of a long track can legitimately take a
/// long time, the pipeline stage deadline bounds it instead.
pub struct HttpAligner {
    client: Client,
    base_url: String,
    format: String,
}

impl HttpAligner {
    pub fn new(config: AlignerConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            format: config.format,
        }
    }

    fn align_url(&self) -> String {
        format!("{}/align", self.base_url)
    }

    async fn post(
        &self,
        lyrics: &str,
        audio: Vec<u8>,
        audio_file_name: &str,
    ) -> Result<Vec<u8>, AlignmentError> {
        let size = audio.len();
        let form = Form::new()
            .text("lyrics", lyrics.to_string())
            .text("format", self.format.clone())
            .part(
                "audio_file",
                Part::bytes(audio).file_name(audio_file_name.to_string()),
            );

        debug!(
            "Alignment request: file='{}', {} bytes audio, {} bytes lyrics",
            audio_file_name,
            size,
            lyrics.len()
        );

        let response = self
            .client
            .post(self.align_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AlignmentError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(AlignmentError::EmptyDocument);
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl LyricsAligner for HttpAligner {
    fn name(&self) -> &str {
        "http"
    }

    async fn align(
        &self,
        lyrics: &str,
        audio: Vec<u8>,
        audio_file_name: &str,
    ) -> Result<Vec<u8>, AlignmentError> {
        let result = self.post(lyrics, audio, audio_file_name).await;
        metrics::record_external_call("aligner", "align", result.is_ok());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_url_trims_slash() {
        let aligner = HttpAligner::new(AlignerConfig {
            base_url: "http://aligner:3000/".to_string(),
            format: "ass".to_string(),
        });
        assert_eq!(aligner.align_url(), "http://aligner:3000/align");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Nothing listens on port 1.
        let aligner = HttpAligner::new(AlignerConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            format: "ass".to_string(),
        });
        let err = aligner.align("la", vec![1, 2, 3], "a.webm").await.unwrap_err();
        assert!(matches!(err, AlignmentError::Http(_)));
    }
}
