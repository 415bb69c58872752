//! Transcript summaries for ranked finalists.

use super::fanout::{run_bounded, Fanout, FanoutLimits};
use crate::error::{GeneratorError, TranscriptError};
use crate::generator::Generator;
use crate::models::{CandidateRecord, FailureKind, SummaryKind, SummaryOutcome};
use crate::transcript::{join_segments, TranscriptProvider, TranscriptSegment};
use crate::utils::{clean_html_entities, collapse_whitespace, truncate_chars};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("transcript is empty")]
    EmptyTranscript,

    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("{0} timed out")]
    Timeout(&'static str),
}

/// Normalized transcript text, at most `char_budget` characters.
pub fn prepare_transcript(segments: &[TranscriptSegment], char_budget: usize) -> String {
    let text = collapse_whitespace(&clean_html_entities(&join_segments(segments)));
    truncate_chars(&text, char_budget).to_string()
}

pub fn build_prompt(transcript: &str, kind: SummaryKind) -> String {
    format!("{}\n\n{}", transcript, kind.instruction())
}

pub struct Summarizer<'a> {
    pub transcripts: &'a dyn TranscriptProvider,
    pub generator: &'a dyn Generator,
    pub char_budget: usize,
    pub call_timeout: Duration,
}

impl<'a> Summarizer<'a> {
    /// Transcript, prompt and generation for a single video.
    pub async fn summarize_one(
        &self,
        catalog_id: &str,
        kind: SummaryKind,
    ) -> Result<String, SummaryError> {
        let segments = tokio::time::timeout(self.call_timeout, self.transcripts.fetch(catalog_id))
            .await
            .map_err(|_| SummaryError::Timeout("transcript fetch"))??;

        let transcript = prepare_transcript(&segments, self.char_budget);
        if transcript.is_empty() {
            return Err(SummaryError::EmptyTranscript);
        }
        tracing::debug!(target: "vidrank.summarizer", catalog_id, chars = transcript.chars().count(), "transcript ready");

        let prompt = build_prompt(&transcript, kind);
        let text = tokio::time::timeout(
            self.call_timeout,
            self.generator.generate(&prompt, kind.max_output_tokens()),
        )
        .await
        .map_err(|_| SummaryError::Timeout("generation"))??;
        Ok(text.trim().to_string())
    }

    /// Attach a [`SummaryOutcome`] to every finalist. Failures stay on the
    /// finalist they belong to.
    pub async fn summarize_finalists(
        &self,
        finalists: &mut [CandidateRecord],
        kind: SummaryKind,
        limits: FanoutLimits,
    ) {
        let ids: Vec<String> = finalists.iter().map(|f| f.catalog_id.clone()).collect();
        let outcome = run_bounded(
            ids.clone(),
            limits,
            |id: String| async move { self.summarize_one(&id, kind).await },
            |_| false,
        )
        .await;

        let slots = match outcome {
            Fanout::Finished(slots) => slots,
            // Nothing here is abort-class.
            Fanout::Aborted { .. } => Vec::new(),
        };

        let mut failed = 0usize;
        for (index, finalist) in finalists.iter_mut().enumerate() {
            let summary = match slots.get(index) {
                Some(Some(Ok(text))) => SummaryOutcome::Summary { text: text.clone() },
                Some(Some(Err(e))) => SummaryOutcome::Failed {
                    kind: FailureKind::Summarization,
                    message: e.to_string(),
                },
                _ => SummaryOutcome::Failed {
                    kind: FailureKind::Summarization,
                    message: "deadline exceeded before summary completed".to_string(),
                },
            };
            if let SummaryOutcome::Failed { message, .. } = &summary {
                failed += 1;
                tracing::warn!(target: "vidrank.summarizer", catalog_id = %ids[index], error = %message, "summary unavailable");
            }
            finalist.summary = Some(summary);
        }

        tracing::info!(
            target: "vidrank.summarizer",
            finalists = finalists.len(),
            failed,
            kind = ?kind,
            "summaries attached"
        );
    }
}
