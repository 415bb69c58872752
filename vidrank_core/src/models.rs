//! Data types flowing through the ranking pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RESULT_LIMIT: usize = 3;

/// Public watch URL for a catalog id.
pub fn watch_url(catalog_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", catalog_id)
}

/// A ranking request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub topic: String,
    pub recency_window_years: u32,
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

fn default_result_limit() -> usize {
    DEFAULT_RESULT_LIMIT
}

impl Query {
    pub fn new(topic: impl Into<String>, recency_window_years: u32) -> Self {
        Self {
            topic: topic.into(),
            recency_window_years,
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, result_limit: usize) -> Self {
        self.result_limit = result_limit;
        self
    }
}

/// One search hit, before enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCandidate {
    pub catalog_id: String,
    pub title: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
}

/// Raw engagement metrics. Absent upstream values are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementSignals {
    pub views: u64,
    pub likes: u64,
    pub dislikes: u64,
    pub comments: u64,
    pub subscribers: u64,
}

/// A fully enriched candidate, owned by the run that produced it.
#[derive(Debug, Clone)]
pub struct CandidateRecord {
    pub catalog_id: String,
    pub title: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    pub signals: EngagementSignals,
    pub duration_seconds: u32,
    /// Position in the upstream search listing; only used to break ties.
    pub retrieval_rank: usize,
    pub score: Option<f64>,
    pub summary: Option<SummaryOutcome>,
}

impl CandidateRecord {
    pub fn from_raw(
        raw: RawCandidate,
        retrieval_rank: usize,
        signals: EngagementSignals,
        duration_seconds: u32,
    ) -> Self {
        Self {
            catalog_id: raw.catalog_id,
            title: raw.title,
            channel_id: raw.channel_id,
            channel_title: raw.channel_title,
            published_at: raw.published_at,
            signals,
            duration_seconds,
            retrieval_rank,
            score: None,
            summary: None,
        }
    }

    pub fn link(&self) -> String {
        watch_url(&self.catalog_id)
    }
}

/// Which kind of condensed text to request for a finalist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    #[default]
    Summary,
    HowTo,
}

impl SummaryKind {
    pub fn instruction(&self) -> &'static str {
        match self {
            SummaryKind::Summary => "Generate a summary for the text displayed above.",
            SummaryKind::HowTo => "Generate a friendly How-To step-by-step guide based on the text displayed above. Make sure to number the steps.",
        }
    }

    pub fn max_output_tokens(&self) -> u32 {
        match self {
            SummaryKind::Summary => 150,
            SummaryKind::HowTo => 300,
        }
    }
}

/// Why a candidate or finalist did not get its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Enrichment,
    DurationParse,
    Summarization,
}

/// Summary attached to a finalist, or the marker recording why there is none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryOutcome {
    Summary { text: String },
    Failed { kind: FailureKind, message: String },
}

impl SummaryOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            SummaryOutcome::Summary { text } => Some(text),
            SummaryOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SummaryOutcome::Failed { .. })
    }
}

/// A candidate dropped by an error rather than by the filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedCandidate {
    pub catalog_id: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Caller-facing ranked entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedVideo {
    pub catalog_id: String,
    pub title: String,
    pub link: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    pub duration_seconds: u32,
    pub score: f64,
    pub signals: EngagementSignals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryOutcome>,
}

impl From<CandidateRecord> for RankedVideo {
    fn from(record: CandidateRecord) -> Self {
        let link = record.link();
        Self {
            catalog_id: record.catalog_id,
            title: record.title,
            link,
            channel_title: record.channel_title,
            published_at: record.published_at,
            duration_seconds: record.duration_seconds,
            score: record.score.unwrap_or_default(),
            signals: record.signals,
            summary: record.summary,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub retrieved: usize,
    pub enriched: usize,
    pub filtered_out: usize,
    pub ranked: usize,
    pub duration_ms: u64,
}

/// Result of one pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankReport {
    pub topic: String,
    pub policy: String,
    pub items: Vec<RankedVideo>,
    pub stats: RunStats,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<DroppedCandidate>,
}

impl RankReport {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
