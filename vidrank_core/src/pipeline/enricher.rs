//! Metadata enrichment.
//!
//! Each candidate needs an item-detail and a channel-detail lookup; the two
//! run concurrently and candidates fan out over [`run_bounded`].

use super::fanout::{run_bounded, Fanout, FanoutLimits};
use crate::catalog::Catalog;
use crate::duration::parse_duration;
use crate::error::{CatalogError, DurationParseError, PipelineError};
use crate::models::{CandidateRecord, DroppedCandidate, EngagementSignals, FailureKind, RawCandidate};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct Enrichment {
    /// Enriched records, in retrieval order.
    pub records: Vec<CandidateRecord>,
    pub dropped: Vec<DroppedCandidate>,
}

#[derive(Debug)]
enum EnrichFailure {
    Lookup(CatalogError),
    Duration(DurationParseError),
}

impl EnrichFailure {
    fn is_abort(&self) -> bool {
        matches!(self, EnrichFailure::Lookup(e) if e.is_abort())
    }
}

async fn bounded_lookup<T>(
    limit: Duration,
    what: &'static str,
    lookup: impl Future<Output = Result<T, CatalogError>>,
) -> Result<T, CatalogError> {
    match tokio::time::timeout(limit, lookup).await {
        Ok(result) => result,
        Err(_) => Err(CatalogError::Timeout(format!(
            "{} exceeded {}ms",
            what,
            limit.as_millis()
        ))),
    }
}

async fn enrich_one(
    catalog: &dyn Catalog,
    retrieval_rank: usize,
    raw: RawCandidate,
    call_timeout: Duration,
) -> Result<CandidateRecord, EnrichFailure> {
    let (detail, channel) = tokio::try_join!(
        bounded_lookup(call_timeout, "video detail", catalog.video_detail(&raw.catalog_id)),
        bounded_lookup(call_timeout, "channel detail", catalog.channel_detail(&raw.channel_id)),
    )
    .map_err(EnrichFailure::Lookup)?;

    let duration_seconds = parse_duration(&detail.duration_token).map_err(EnrichFailure::Duration)?;
    let signals = EngagementSignals {
        views: detail.views,
        likes: detail.likes,
        dislikes: detail.dislikes,
        comments: detail.comments,
        subscribers: channel.subscribers,
    };
    Ok(CandidateRecord::from_raw(raw, retrieval_rank, signals, duration_seconds))
}

/// Enrich every candidate.
///
/// Per-candidate failures land in [`Enrichment::dropped`]. An abort-class
/// catalog error fails the whole run, as does a run where nothing was
/// enriched and at least one lookup failed.
pub async fn enrich_all(
    catalog: &dyn Catalog,
    candidates: Vec<RawCandidate>,
    limits: FanoutLimits,
) -> Result<Enrichment, PipelineError> {
    let ids: Vec<String> = candidates.iter().map(|c| c.catalog_id.clone()).collect();
    let total = ids.len();
    let call_timeout = limits.call_timeout;

    let items: Vec<(usize, RawCandidate)> = candidates.into_iter().enumerate().collect();
    let outcome = run_bounded(
        items,
        limits,
        |(rank, raw): (usize, RawCandidate)| enrich_one(catalog, rank, raw, call_timeout),
        |result: &Result<CandidateRecord, EnrichFailure>| {
            matches!(result, Err(failure) if failure.is_abort())
        },
    )
    .await;

    let slots = match outcome {
        Fanout::Finished(slots) => slots,
        Fanout::Aborted { index, outcome } => {
            let reason = match outcome {
                Err(EnrichFailure::Lookup(e)) => e.to_string(),
                _ => "enrichment aborted".to_string(),
            };
            tracing::warn!(target: "vidrank.enricher", catalog_id = %ids[index], error = %reason, "aborting enrichment");
            return Err(PipelineError::Retrieval(reason));
        }
    };

    let mut enrichment = Enrichment::default();
    let mut lookup_failures = 0usize;
    for (index, slot) in slots.into_iter().enumerate() {
        let catalog_id = &ids[index];
        let (kind, message) = match slot {
            Some(Ok(record)) => {
                enrichment.records.push(record);
                continue;
            }
            Some(Err(EnrichFailure::Lookup(e))) => {
                lookup_failures += 1;
                (FailureKind::Enrichment, e.to_string())
            }
            Some(Err(EnrichFailure::Duration(e))) => (FailureKind::DurationParse, e.to_string()),
            None => {
                lookup_failures += 1;
                (
                    FailureKind::Enrichment,
                    "deadline exceeded before lookup completed".to_string(),
                )
            }
        };
        tracing::warn!(target: "vidrank.enricher", catalog_id = %catalog_id, kind = ?kind, error = %message, "candidate dropped");
        enrichment.dropped.push(DroppedCandidate {
            catalog_id: catalog_id.clone(),
            kind,
            message,
        });
    }

    if enrichment.records.is_empty() && lookup_failures > 0 {
        return Err(PipelineError::Retrieval(format!(
            "no candidate could be enriched ({} lookup failures)",
            lookup_failures
        )));
    }

    tracing::debug!(
        target: "vidrank.enricher",
        total,
        enriched = enrichment.records.len(),
        dropped = enrichment.dropped.len(),
        "enrichment complete"
    );
    Ok(enrichment)
}
