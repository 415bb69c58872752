use crate::catalog::{Catalog, SearchRequest};
use crate::config::CatalogConfig;
use crate::error::{CatalogError, PipelineError};
use crate::models::{Query, RawCandidate};
use std::collections::HashSet;
use std::time::Duration;

/// Search the catalog for `query.topic`, keeping upstream order and
/// collapsing duplicate ids. Any search failure is fatal for the run.
pub async fn retrieve(
    catalog: &dyn Catalog,
    query: &Query,
    config: &CatalogConfig,
    call_timeout: Duration,
) -> Result<Vec<RawCandidate>, PipelineError> {
    let request = SearchRequest {
        topic: query.topic.trim().to_string(),
        max_results: config.max_candidates,
        duration_bucket: config.duration_bucket,
    };

    let found = tokio::time::timeout(call_timeout, catalog.search(&request))
        .await
        .unwrap_or_else(|_| {
            Err(CatalogError::Timeout(format!(
                "search exceeded {}ms",
                call_timeout.as_millis()
            )))
        })
        .map_err(|e| {
            tracing::warn!(target: "vidrank.retriever", catalog = catalog.name(), error = %e, "search failed");
            PipelineError::Retrieval(e.to_string())
        })?;

    let returned = found.len();
    let candidates = dedupe(found);
    tracing::debug!(
        target: "vidrank.retriever",
        topic = %request.topic,
        returned,
        kept = candidates.len(),
        "search complete"
    );
    Ok(candidates)
}

fn dedupe(found: Vec<RawCandidate>) -> Vec<RawCandidate> {
    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter(|c| seen.insert(c.catalog_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn raw(id: &str) -> RawCandidate {
        RawCandidate {
            catalog_id: id.to_string(),
            title: format!("title {}", id),
            channel_id: "chan".to_string(),
            channel_title: "Channel".to_string(),
            published_at: Utc::now(),
        }
    }

    #[test]
    fn dedupe_keeps_first_occurrence_in_order() {
        let out = dedupe(vec![raw("a"), raw("b"), raw("a"), raw("c"), raw("b")]);
        let ids: Vec<_> = out.iter().map(|c| c.catalog_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
