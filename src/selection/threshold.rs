use tracing::debug;

use crate::{
    config::Config,
    scoring::ScoredSegment,
    selection::ledger::SelectionLedger,
    selection::traits::{Selection, Selector},
};

/// Parameter key for the minimum accepted score
pub const MIN_SCORE: &str = "min_score";

const DEFAULT_MIN_SCORE: f64 = 60.0;

/// Template-style selection: every segment above a score floor, in order
///
/// Walks candidates chronologically and keeps those scoring at least
/// `min_score` while they fit the overflow allowance.
pub struct ThresholdSelector;

impl ThresholdSelector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ThresholdSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl Selector for ThresholdSelector {
    fn name(&self) -> &str {
        "threshold"
    }

    fn description(&self) -> &str {
        "Chronological pass keeping segments above a minimum score"
    }

    fn select(&self, scored: &[ScoredSegment], config: &Config) -> Selection {
        let target = config.edit.target_duration;
        let limit = target * config.tuning.overflow_factor;
        let stop_at = target * config.tuning.early_stop_ratio;
        let min_score = config.strategy.get_f64_or(MIN_SCORE, DEFAULT_MIN_SCORE);

        let mut ledger = SelectionLedger::new(scored);
        let eligible = ledger.filter_short(config.edit.min_segment_duration);

        let mut passing = Vec::with_capacity(eligible.len());
        for index in eligible {
            let score = ledger.candidate(index).score;
            if score < min_score {
                ledger.reject(index, format!("score {:.1} is below the {:.1} minimum", score, min_score));
            } else {
                passing.push(index);
            }
        }
        let available = ledger.duration_of(&passing);

        for (position, &index) in passing.iter().enumerate() {
            if ledger.accumulated() >= stop_at {
                let reason = format!(
                    "not evaluated: {:.1}s already reached {:.0}% of the {:.1}s target",
                    ledger.accumulated(),
                    config.tuning.early_stop_ratio * 100.0,
                    target
                );
                for &skipped in &passing[position..] {
                    ledger.reject(skipped, reason.clone());
                }
                break;
            }

            let duration = ledger.candidate(index).duration();
            if ledger.fits(index, limit) {
                let reason = format!(
                    "selected above minimum score: accumulated {:.1}s of {:.1}s target",
                    ledger.accumulated() + duration,
                    target
                );
                ledger.accept(index, reason);
            } else {
                let reason = format!(
                    "adding {:.1}s would reach {:.1}s, over the {:.1}s limit",
                    duration,
                    ledger.accumulated() + duration,
                    limit
                );
                ledger.reject(index, reason);
            }
        }

        ledger.flag_insufficient_content(available, target);
        ledger.annotate_neighbors();

        let selection = ledger.finish();
        debug!(
            "Threshold selection (min {:.1}): {} of {} segments",
            min_score,
            selection.selected.len(),
            scored.len()
        );

        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::Segment;
    use crate::trace::DecisionTrace;

    fn candidate(ordinal: usize, start: f64, duration: f64, score: f64) -> ScoredSegment {
        ScoredSegment::new(
            Segment::new("src", ordinal, start, start + duration),
            score,
            DecisionTrace::new(),
        )
    }

    fn config(target: f64) -> Config {
        let mut config = Config::default();
        config.edit.target_duration = target;
        config
    }

    #[test]
    fn test_keeps_segments_above_minimum_in_order() {
        let candidates = vec![
            candidate(1, 0.0, 5.0, 65.0),
            candidate(2, 5.0, 5.0, 40.0),
            candidate(3, 10.0, 5.0, 90.0),
        ];
        let selection = ThresholdSelector::new().select(&candidates, &config(20.0));

        assert_eq!(selection.selected_ids(), vec!["src-0001", "src-0003"]);
        let low = &selection.rejected[0];
        assert!(low.explain.rejected_because.as_ref().unwrap()[0].contains("below the 60.0 minimum"));
    }

    #[test]
    fn test_min_score_parameter() {
        let candidates = vec![candidate(1, 0.0, 5.0, 65.0), candidate(2, 5.0, 5.0, 40.0)];
        let mut config = config(20.0);
        config.strategy = config.strategy.set(MIN_SCORE, 30.0);

        let selection = ThresholdSelector::new().select(&candidates, &config);
        assert_eq!(selection.selected.len(), 2);
    }

    #[test]
    fn test_chronological_walk_stops_at_target() {
        let candidates = vec![
            candidate(1, 0.0, 10.0, 61.0),
            candidate(2, 10.0, 10.0, 95.0),
            candidate(3, 20.0, 5.0, 99.0),
        ];
        let selection = ThresholdSelector::new().select(&candidates, &config(10.0));

        // Chronological, not by score: the first passing segment fills the target
        assert_eq!(selection.selected_ids(), vec!["src-0001"]);
        assert_eq!(selection.rejected.len(), 2);
    }

    #[test]
    fn test_nothing_passes() {
        let candidates = vec![candidate(1, 0.0, 5.0, 10.0)];
        let selection = ThresholdSelector::new().select(&candidates, &config(10.0));

        assert!(selection.is_empty());
        assert!(selection.rejected[0].explain.is_rejected());
    }
}
