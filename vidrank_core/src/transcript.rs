//! Transcript collaborator.

use crate::error::TranscriptError;
use async_trait::async_trait;

/// One timed caption segment.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Ordered caption segments for one video.
    async fn fetch(&self, catalog_id: &str) -> Result<Vec<TranscriptSegment>, TranscriptError>;
}

/// Join segment text with single spaces.
pub fn join_segments(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(feature = "transcripts")]
pub use youtube::YtTranscriptProvider;

#[cfg(feature = "transcripts")]
mod youtube {
    use super::{TranscriptProvider, TranscriptSegment};
    use crate::error::TranscriptError;
    use async_trait::async_trait;
    use yt_transcript_rs::YouTubeTranscriptApi;

    /// Captions fetched from YouTube's public timedtext endpoints.
    pub struct YtTranscriptProvider {
        api: YouTubeTranscriptApi,
        languages: Vec<String>,
    }

    impl YtTranscriptProvider {
        pub fn new(languages: Vec<String>) -> Result<Self, TranscriptError> {
            let api = YouTubeTranscriptApi::new(None, None, None)
                .map_err(|e| TranscriptError::Provider(e.to_string()))?;
            let languages = if languages.is_empty() {
                vec!["en".to_string()]
            } else {
                languages
            };
            Ok(Self { api, languages })
        }
    }

    #[async_trait]
    impl TranscriptProvider for YtTranscriptProvider {
        async fn fetch(
            &self,
            catalog_id: &str,
        ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
            let langs: Vec<&str> = self.languages.iter().map(String::as_str).collect();
            let fetched = self
                .api
                .fetch_transcript(catalog_id, &langs, false)
                .await
                .map_err(|e| {
                    tracing::debug!(target: "vidrank.transcript", catalog_id, error = %e, "transcript fetch failed");
                    TranscriptError::Unavailable(format!("{}: {}", catalog_id, e))
                })?;

            Ok(fetched
                .parts()
                .iter()
                .map(|p| TranscriptSegment {
                    text: p.text.clone(),
                    start: p.start,
                    duration: p.duration,
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_single_spaces() {
        let segments = vec![
            TranscriptSegment {
                text: "hello".to_string(),
                start: 0.0,
                duration: 1.0,
            },
            TranscriptSegment {
                text: "world".to_string(),
                start: 1.0,
                duration: 1.0,
            },
        ];
        assert_eq!(join_segments(&segments), "hello world");
        assert_eq!(join_segments(&[]), "");
    }
}
