//! The ranking pipeline: retrieve, enrich, filter, score, rank and
//! optionally summarize.
//!
//! A [`Pipeline`] owns its configuration and collaborators and holds no
//! per-query state, so one instance can serve any number of queries.

pub mod enricher;
pub mod fanout;
pub mod filter;
pub mod ranker;
pub mod retriever;
pub mod summarizer;

use crate::catalog::{Catalog, YouTubeCatalog};
use crate::config::VidrankConfig;
use crate::error::PipelineError;
use crate::generator::{Generator, OpenAiGenerator};
use crate::models::{Query, RankReport, RankedVideo, RunStats, SummaryKind};
use crate::scoring::{policy_from_config, ScoringPolicy};
use crate::transcript::TranscriptProvider;
use crate::utils::extract_video_id;
use chrono::{DateTime, Datelike, Utc};
use fanout::FanoutLimits;
use std::sync::Arc;
use std::time::Duration;
use summarizer::Summarizer;
use tokio::time::Instant;

/// Source of "now" for the recency window.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct Pipeline {
    config: VidrankConfig,
    catalog: Option<Arc<dyn Catalog>>,
    transcripts: Option<Arc<dyn TranscriptProvider>>,
    generator: Option<Arc<dyn Generator>>,
    policy: Box<dyn ScoringPolicy>,
    clock: Clock,
}

impl Pipeline {
    /// Pipeline over `catalog` with no summarization collaborators.
    pub fn new(config: VidrankConfig, catalog: Arc<dyn Catalog>) -> Result<Self, PipelineError> {
        let mut pipeline = Self::without_catalog(config)?;
        pipeline.catalog = Some(catalog);
        Ok(pipeline)
    }

    fn without_catalog(config: VidrankConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let policy = policy_from_config(&config.scoring);
        Ok(Self {
            config,
            catalog: None,
            transcripts: None,
            generator: None,
            policy,
            clock: Arc::new(Utc::now),
        })
    }

    /// Build the shipped adapters from `config`.
    ///
    /// Each adapter is only built when its key is present. Without the
    /// catalog key ranking is unavailable; without the generator key
    /// summaries are. Single-video summaries never need the catalog.
    pub fn from_config(config: VidrankConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let call_timeout = Duration::from_millis(config.fanout.call_timeout_ms);
        let catalog = if has_key(&config.catalog.api_key) {
            Some(YouTubeCatalog::new(&config.catalog, call_timeout)?)
        } else {
            None
        };
        let generator = if has_key(&config.generator.api_key) {
            Some(OpenAiGenerator::new(&config.generator, call_timeout)?)
        } else {
            None
        };

        #[cfg(feature = "transcripts")]
        let transcripts = crate::transcript::YtTranscriptProvider::new(
            config.transcripts.languages.clone(),
        )
        .map_err(|e| PipelineError::Configuration(e.to_string()))?;

        let mut pipeline = Self::without_catalog(config)?;
        if let Some(catalog) = catalog {
            pipeline.catalog = Some(Arc::new(catalog));
        }
        if let Some(generator) = generator {
            pipeline = pipeline.with_generator(Arc::new(generator));
        }
        #[cfg(feature = "transcripts")]
        {
            pipeline = pipeline.with_transcripts(Arc::new(transcripts));
        }
        Ok(pipeline)
    }

    pub fn with_transcripts(mut self, transcripts: Arc<dyn TranscriptProvider>) -> Self {
        self.transcripts = Some(transcripts);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_policy(mut self, policy: Box<dyn ScoringPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &VidrankConfig {
        &self.config
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Whether [`Pipeline::rank`] can run.
    pub fn can_rank(&self) -> bool {
        self.catalog.is_some()
    }

    /// Whether [`Pipeline::rank_with_summaries`] can run.
    pub fn can_summarize(&self) -> bool {
        self.transcripts.is_some() && self.generator.is_some()
    }

    /// Ranked top-K for `query`, without summaries.
    pub async fn rank(&self, query: &Query) -> Result<RankReport, PipelineError> {
        self.run(query, None).await
    }

    /// Ranked top-K with a summary (or failure marker) on every finalist.
    pub async fn rank_with_summaries(
        &self,
        query: &Query,
        kind: SummaryKind,
    ) -> Result<RankReport, PipelineError> {
        let summarizer = self.summarizer()?;
        self.run(query, Some((&summarizer, kind))).await
    }

    /// Summary text for one video id or YouTube URL.
    pub async fn summarize_video(
        &self,
        input: &str,
        kind: SummaryKind,
    ) -> Result<String, PipelineError> {
        let catalog_id = extract_video_id(input).ok_or_else(|| {
            PipelineError::InvalidQuery(format!("not a video id or YouTube URL: '{}'", input.trim()))
        })?;
        let summarizer = self.summarizer()?;

        let started = Instant::now();
        let deadline = started + Duration::from_millis(self.config.fanout.deadline_ms);
        let text = tokio::time::timeout_at(deadline, summarizer.summarize_one(&catalog_id, kind))
            .await
            .map_err(|_| PipelineError::Summarization("deadline exceeded".to_string()))?
            .map_err(|e| PipelineError::Summarization(e.to_string()))?;

        tracing::info!(
            target: "vidrank.pipeline",
            catalog_id = %catalog_id,
            kind = ?kind,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "video summarized"
        );
        Ok(text)
    }

    fn summarizer(&self) -> Result<Summarizer<'_>, PipelineError> {
        let transcripts = self.transcripts.as_deref().ok_or_else(|| {
            PipelineError::Configuration("no transcript provider configured".to_string())
        })?;
        let generator = self.generator.as_deref().ok_or_else(|| {
            PipelineError::Configuration(
                "generator.api_key not set (or OPENAI_API_KEY)".to_string(),
            )
        })?;
        Ok(Summarizer {
            transcripts,
            generator,
            char_budget: self.config.transcripts.char_budget,
            call_timeout: Duration::from_millis(self.config.fanout.call_timeout_ms),
        })
    }

    async fn run(
        &self,
        query: &Query,
        summaries: Option<(&Summarizer<'_>, SummaryKind)>,
    ) -> Result<RankReport, PipelineError> {
        validate_query(query)?;
        let catalog = self.catalog.as_deref().ok_or_else(|| {
            PipelineError::Configuration("catalog.api_key not set (or YOUTUBE_API_KEY)".to_string())
        })?;
        let started = Instant::now();
        let limits = FanoutLimits::from_config(&self.config.fanout, started);
        let current_year = (self.clock)().year();

        let candidates = retriever::retrieve(
            catalog,
            query,
            &self.config.catalog,
            limits.call_timeout,
        )
        .await?;
        let retrieved = candidates.len();

        let enrichment = enricher::enrich_all(catalog, candidates, limits).await?;
        let enriched = enrichment.records.len();

        let (mut survivors, filtered_out) = filter::apply(enrichment.records, query, current_year);
        ranker::score_all(&mut survivors, self.policy.as_ref());
        let mut finalists = ranker::rank(survivors, query.result_limit);

        if let Some((summarizer, kind)) = summaries {
            if !finalists.is_empty() {
                summarizer
                    .summarize_finalists(&mut finalists, kind, limits)
                    .await;
            }
        }

        let stats = RunStats {
            retrieved,
            enriched,
            filtered_out,
            ranked: finalists.len(),
            duration_ms: started.elapsed().as_millis() as u64,
        };
        tracing::info!(
            target: "vidrank.pipeline",
            topic = %query.topic,
            policy = self.policy.name(),
            retrieved = stats.retrieved,
            enriched = stats.enriched,
            filtered_out = stats.filtered_out,
            ranked = stats.ranked,
            elapsed_ms = stats.duration_ms,
            "query ranked"
        );

        Ok(RankReport {
            topic: query.topic.clone(),
            policy: self.policy.name().to_string(),
            items: finalists.into_iter().map(RankedVideo::from).collect(),
            stats,
            dropped: enrichment.dropped,
        })
    }
}

fn has_key(key: &Option<String>) -> bool {
    key.as_deref().is_some_and(|k| !k.trim().is_empty())
}

fn validate_query(query: &Query) -> Result<(), PipelineError> {
    if query.topic.trim().is_empty() {
        return Err(PipelineError::InvalidQuery("topic must not be empty".to_string()));
    }
    if query.result_limit == 0 {
        return Err(PipelineError::InvalidQuery("result_limit must be at least 1".to_string()));
    }
    Ok(())
}
