use crate::models::CandidateRecord;
use crate::scoring::ScoringPolicy;
use std::cmp::Ordering;

/// Attach a score to every record.
pub fn score_all(records: &mut [CandidateRecord], policy: &dyn ScoringPolicy) {
    for record in records.iter_mut() {
        record.score = Some(policy.score(&record.signals));
    }
}

fn compare(a: &CandidateRecord, b: &CandidateRecord) -> Ordering {
    let sa = a.score.unwrap_or(f64::NEG_INFINITY);
    let sb = b.score.unwrap_or(f64::NEG_INFINITY);
    sb.total_cmp(&sa)
        .then_with(|| b.published_at.cmp(&a.published_at))
        .then_with(|| a.retrieval_rank.cmp(&b.retrieval_rank))
}

/// Order by score descending and keep the top `limit`.
///
/// Equal scores go to the newer item, then to the earlier search position.
pub fn rank(mut records: Vec<CandidateRecord>, limit: usize) -> Vec<CandidateRecord> {
    records.sort_by(compare);
    records.truncate(limit);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EngagementSignals, RawCandidate};
    use chrono::{Duration, TimeZone, Utc};

    fn scored(id: &str, score: f64, days_old: i64, retrieval_rank: usize) -> CandidateRecord {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let raw = RawCandidate {
            catalog_id: id.to_string(),
            title: id.to_string(),
            channel_id: "c".to_string(),
            channel_title: "C".to_string(),
            published_at: base - Duration::days(days_old),
        };
        let mut r = CandidateRecord::from_raw(raw, retrieval_rank, EngagementSignals::default(), 600);
        r.score = Some(score);
        r
    }

    fn ids(records: &[CandidateRecord]) -> Vec<&str> {
        records.iter().map(|r| r.catalog_id.as_str()).collect()
    }

    #[test]
    fn sorts_descending_and_truncates() {
        let out = rank(
            vec![scored("a", 1.0, 0, 0), scored("b", 5.0, 0, 1), scored("c", 3.0, 0, 2)],
            2,
        );
        assert_eq!(ids(&out), vec!["b", "c"]);
    }

    #[test]
    fn length_is_min_of_limit_and_input() {
        let out = rank(vec![scored("a", 1.0, 0, 0)], 3);
        assert_eq!(out.len(), 1);
        assert!(rank(Vec::new(), 3).is_empty());
    }

    #[test]
    fn ties_prefer_newer_then_retrieval_order() {
        let out = rank(
            vec![
                scored("old", 2.0, 30, 0),
                scored("new", 2.0, 1, 1),
                scored("same-day-late", 2.0, 1, 2),
            ],
            3,
        );
        assert_eq!(ids(&out), vec!["new", "same-day-late", "old"]);
    }

    #[test]
    fn scores_are_non_increasing() {
        let out = rank(
            (0..8)
                .map(|i| scored(&i.to_string(), ((i * 7) % 5) as f64, 0, i))
                .collect(),
            8,
        );
        assert!(out
            .windows(2)
            .all(|w| w[0].score.unwrap() >= w[1].score.unwrap()));
    }
}
