//! Scoring policies.
//!
//! A policy maps one candidate's own signals to a comparable number. There
//! is no normalization across candidates, so scores from different runs of
//! the same policy are directly comparable.

use crate::config::{ScoringConfig, ScoringPolicyKind, SignalWeights};
use crate::models::EngagementSignals;

pub trait ScoringPolicy: Send + Sync {
    fn name(&self) -> &'static str;
    fn score(&self, signals: &EngagementSignals) -> f64;
}

/// `views * ratio^n` where `ratio = likes / (likes + dislikes)`, or 0 with no votes.
#[derive(Debug, Clone, Copy)]
pub struct RatioAmplified {
    pub exponent: i32,
}

impl Default for RatioAmplified {
    fn default() -> Self {
        Self { exponent: 3 }
    }
}

impl RatioAmplified {
    pub fn approval_ratio(signals: &EngagementSignals) -> f64 {
        let votes = signals.likes.saturating_add(signals.dislikes);
        if votes == 0 {
            return 0.0;
        }
        signals.likes as f64 / votes as f64
    }
}

impl ScoringPolicy for RatioAmplified {
    fn name(&self) -> &'static str {
        "ratio"
    }

    fn score(&self, signals: &EngagementSignals) -> f64 {
        if signals.likes == 0 && signals.dislikes == 0 {
            return 0.0;
        }
        signals.views as f64 * Self::approval_ratio(signals).powi(self.exponent)
    }
}

/// Linear blend of views, likes, comments and subscribers.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedSum {
    pub weights: SignalWeights,
}

impl ScoringPolicy for WeightedSum {
    fn name(&self) -> &'static str {
        "weighted"
    }

    fn score(&self, signals: &EngagementSignals) -> f64 {
        let w = &self.weights;
        w.views * signals.views as f64
            + w.likes * signals.likes as f64
            + w.comments * signals.comments as f64
            + w.subscribers * signals.subscribers as f64
    }
}

/// Build the policy selected in config.
pub fn policy_from_config(config: &ScoringConfig) -> Box<dyn ScoringPolicy> {
    match config.policy {
        ScoringPolicyKind::Ratio => Box::new(RatioAmplified {
            exponent: config.exponent,
        }),
        ScoringPolicyKind::Weighted => Box::new(WeightedSum {
            weights: config.weights,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(views: u64, likes: u64, dislikes: u64, comments: u64, subs: u64) -> EngagementSignals {
        EngagementSignals {
            views,
            likes,
            dislikes,
            comments,
            subscribers: subs,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn ratio_is_zero_without_votes() {
        let s = signals(1_000_000, 0, 0, 50, 10);
        assert_eq!(RatioAmplified::approval_ratio(&s), 0.0);
        assert_eq!(RatioAmplified::default().score(&s), 0.0);
        assert_eq!(RatioAmplified { exponent: 0 }.score(&s), 0.0);
    }

    #[test]
    fn exponent_zero_scores_views_once_voted() {
        let policy = RatioAmplified { exponent: 0 };
        assert!(close(policy.score(&signals(500, 1, 9, 0, 0)), 500.0));
    }

    #[test]
    fn ratio_policy_cubes_approval_by_default() {
        let s = signals(1000, 90, 10, 0, 0);
        assert!(close(RatioAmplified::approval_ratio(&s), 0.9));
        assert!(close(RatioAmplified::default().score(&s), 1000.0 * 0.729));
    }

    #[test]
    fn ratio_policy_honors_exponent() {
        let s = signals(400, 3, 1, 0, 0);
        let linear = RatioAmplified { exponent: 1 };
        let squared = RatioAmplified { exponent: 2 };
        assert!(close(linear.score(&s), 300.0));
        assert!(close(squared.score(&s), 225.0));
    }

    #[test]
    fn ratio_prefers_quality_over_volume() {
        let policy = RatioAmplified::default();
        let beloved = signals(10_000, 990, 10, 0, 0);
        let divisive = signals(12_000, 500, 500, 0, 0);
        assert!(policy.score(&beloved) > policy.score(&divisive));
    }

    #[test]
    fn weighted_sum_matches_formula() {
        let policy = WeightedSum::default();
        for (v, l, c, s) in [(0u64, 0u64, 0u64, 0u64), (1000, 100, 10, 5000), (7, 3, 1, 2)] {
            let expected = 0.5 * v as f64 + 0.3 * l as f64 + 0.1 * c as f64 + 0.1 * s as f64;
            assert!(close(policy.score(&signals(v, l, 99, c, s)), expected));
        }
    }

    #[test]
    fn weighted_sum_ignores_dislikes() {
        let policy = WeightedSum::default();
        assert_eq!(
            policy.score(&signals(10, 10, 0, 0, 0)),
            policy.score(&signals(10, 10, 500, 0, 0))
        );
    }

    #[test]
    fn config_selects_policy() {
        let mut config = ScoringConfig::default();
        assert_eq!(policy_from_config(&config).name(), "ratio");
        config.policy = ScoringPolicyKind::Weighted;
        assert_eq!(policy_from_config(&config).name(), "weighted");
    }
}
