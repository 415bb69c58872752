use crate::models::{CandidateRecord, Query};
use chrono::Datelike;

/// Shortest accepted duration, exclusive.
pub const MIN_DURATION_SECS: u32 = 60;
/// Longest accepted duration, exclusive.
pub const MAX_DURATION_SECS: u32 = 3600;

/// Recency and duration window.
pub fn passes(record: &CandidateRecord, query: &Query, current_year: i32) -> bool {
    let window = i32::try_from(query.recency_window_years).unwrap_or(i32::MAX);
    let cutoff = current_year.saturating_sub(window);
    record.published_at.year() >= cutoff
        && record.duration_seconds > MIN_DURATION_SECS
        && record.duration_seconds < MAX_DURATION_SECS
}

/// Keep the records that pass, in order. Returns the survivors and the
/// number filtered out.
pub fn apply(
    records: Vec<CandidateRecord>,
    query: &Query,
    current_year: i32,
) -> (Vec<CandidateRecord>, usize) {
    let before = records.len();
    let kept: Vec<CandidateRecord> = records
        .into_iter()
        .filter(|r| passes(r, query, current_year))
        .collect();
    let filtered_out = before - kept.len();
    (kept, filtered_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EngagementSignals, RawCandidate};
    use chrono::{TimeZone, Utc};

    fn record(year: i32, duration_seconds: u32) -> CandidateRecord {
        let raw = RawCandidate {
            catalog_id: format!("{}-{}", year, duration_seconds),
            title: "t".to_string(),
            channel_id: "c".to_string(),
            channel_title: "C".to_string(),
            published_at: Utc.with_ymd_and_hms(year, 6, 1, 12, 0, 0).unwrap(),
        };
        CandidateRecord::from_raw(raw, 0, EngagementSignals::default(), duration_seconds)
    }

    #[test]
    fn duration_bounds_are_exclusive() {
        let q = Query::new("rust", 2);
        assert!(!passes(&record(2024, 60), &q, 2024));
        assert!(passes(&record(2024, 61), &q, 2024));
        assert!(passes(&record(2024, 3599), &q, 2024));
        assert!(!passes(&record(2024, 3600), &q, 2024));
    }

    #[test]
    fn recency_cutoff_is_inclusive() {
        let q = Query::new("rust", 2);
        assert!(passes(&record(2022, 600), &q, 2024));
        assert!(!passes(&record(2021, 600), &q, 2024));

        let this_year_only = Query::new("rust", 0);
        assert!(passes(&record(2024, 600), &this_year_only, 2024));
        assert!(!passes(&record(2023, 600), &this_year_only, 2024));
    }

    #[test]
    fn apply_counts_filtered() {
        let q = Query::new("rust", 2);
        let (kept, filtered_out) = apply(
            vec![record(2024, 45), record(2024, 600), record(2024, 4000), record(2010, 600)],
            &q,
            2024,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].duration_seconds, 600);
        assert_eq!(filtered_out, 3);
    }
}
