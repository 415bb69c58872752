//! Bounded fan-out shared by the enricher and the summarizer.
//!
//! At most `max_in_flight` tasks are polled at once. Every task is bounded
//! by the run's deadline; a task that has not produced a value by then
//! leaves its slot empty. Results are written into slots addressed by input
//! position, so output order never depends on completion order.

use crate::config::FanoutConfig;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct FanoutLimits {
    pub max_in_flight: usize,
    pub call_timeout: Duration,
    pub deadline: Instant,
}

impl FanoutLimits {
    /// Limits for a run that started at `started`.
    pub fn from_config(config: &FanoutConfig, started: Instant) -> Self {
        Self {
            max_in_flight: config.max_in_flight.max(1),
            call_timeout: Duration::from_millis(config.call_timeout_ms),
            deadline: started + Duration::from_millis(config.deadline_ms),
        }
    }
}

#[derive(Debug)]
pub enum Fanout<T> {
    /// Every task ran; `None` marks a task cut off by the deadline.
    Finished(Vec<Option<T>>),
    /// A task produced an abort-class outcome. Tasks still in flight were
    /// dropped and those not yet started never ran.
    Aborted { index: usize, outcome: T },
}

/// Run `task` over `items` with bounded concurrency.
///
/// `should_abort` is checked as each outcome arrives; the first match stops
/// polling the stream.
pub async fn run_bounded<I, T, F, Fut, A>(
    items: Vec<I>,
    limits: FanoutLimits,
    task: F,
    should_abort: A,
) -> Fanout<T>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = T>,
    A: Fn(&T) -> bool,
{
    let total = items.len();
    let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();
    let deadline = limits.deadline;

    let mut pending = stream::iter(items.into_iter().enumerate().map(|(index, item)| {
        let fut = task(item);
        async move { (index, tokio::time::timeout_at(deadline, fut).await.ok()) }
    }))
    .buffer_unordered(limits.max_in_flight.max(1));

    let mut cut_off = 0usize;
    while let Some((index, outcome)) = pending.next().await {
        match outcome {
            Some(value) if should_abort(&value) => {
                tracing::warn!(target: "vidrank.fanout", index, total, "abort-class outcome, cancelling remaining tasks");
                return Fanout::Aborted {
                    index,
                    outcome: value,
                };
            }
            Some(value) => slots[index] = Some(value),
            None => cut_off += 1,
        }
    }

    if cut_off > 0 {
        tracing::warn!(target: "vidrank.fanout", total, cut_off, "deadline reached before all tasks finished");
    } else {
        tracing::debug!(target: "vidrank.fanout", total, max_in_flight = limits.max_in_flight, "fan-out complete");
    }
    Fanout::Finished(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn limits(max_in_flight: usize, deadline: Duration) -> FanoutLimits {
        FanoutLimits {
            max_in_flight,
            call_timeout: Duration::from_millis(100),
            deadline: Instant::now() + deadline,
        }
    }

    #[tokio::test]
    async fn slots_follow_input_order() {
        let items: Vec<u64> = vec![0, 1, 2, 3];
        let result = run_bounded(
            items,
            limits(4, Duration::from_secs(5)),
            |i| async move {
                // Later inputs finish first.
                tokio::time::sleep(Duration::from_millis((4 - i) * 10)).await;
                i * 10
            },
            |_| false,
        )
        .await;

        match result {
            Fanout::Finished(slots) => {
                assert_eq!(slots, vec![Some(0), Some(10), Some(20), Some(30)]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn never_exceeds_max_in_flight() {
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let result = run_bounded(
            (0..10).collect::<Vec<_>>(),
            limits(2, Duration::from_secs(5)),
            |i| {
                let current = Arc::clone(&current);
                let peak = Arc::clone(&peak);
                async move {
                    let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    current.fetch_sub(1, Ordering::SeqCst);
                    i
                }
            },
            |_| false,
        )
        .await;

        assert!(matches!(result, Fanout::Finished(ref s) if s.iter().all(Option::is_some)));
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn abort_stops_remaining_work() {
        let started = Arc::new(AtomicUsize::new(0));

        let result = run_bounded(
            (0..10).collect::<Vec<usize>>(),
            limits(1, Duration::from_secs(5)),
            |i| {
                let started = Arc::clone(&started);
                async move {
                    started.fetch_add(1, Ordering::SeqCst);
                    i
                }
            },
            |i| *i == 3,
        )
        .await;

        match result {
            Fanout::Aborted { index, outcome } => {
                assert_eq!(index, 3);
                assert_eq!(outcome, 3);
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(started.load(Ordering::SeqCst) < 10);
    }

    #[tokio::test]
    async fn deadline_leaves_slot_empty() {
        let result = run_bounded(
            vec![0u64, 1, 2],
            limits(3, Duration::from_millis(50)),
            |i| async move {
                if i == 1 {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
                i
            },
            |_| false,
        )
        .await;

        match result {
            Fanout::Finished(slots) => assert_eq!(slots, vec![Some(0), None, Some(2)]),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn limits_from_config() {
        let started = Instant::now();
        let limits = FanoutLimits::from_config(&FanoutConfig::default(), started);
        assert_eq!(limits.max_in_flight, 8);
        assert_eq!(limits.call_timeout, Duration::from_millis(10_000));
        assert_eq!(limits.deadline, started + Duration::from_millis(30_000));
    }
}
