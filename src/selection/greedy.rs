use tracing::debug;

use crate::{
    config::{Config, Mood},
    scoring::ScoredSegment,
    selection::ledger::SelectionLedger,
    selection::traits::{Selection, Selector},
};

/// Picks the highest-scoring segments until the target duration is reached
///
/// Candidates are ranked by score. Each cluster starts at its highest score
/// and takes every following candidate closer than
/// `tuning.tie_break_threshold` to that first score. The mood reorders each
/// cluster by duration: energetic edits favour shorter
/// segments, calm edits longer ones.
pub struct GreedySelector;

impl GreedySelector {
    pub fn new() -> Self {
        Self
    }

    /// Ranked candidate indices, best first
    fn rank(&self, candidates: &[ScoredSegment], eligible: Vec<usize>, mood: Mood, tie_threshold: f64) -> Vec<usize> {
        let mut by_score = eligible;
        by_score.sort_by(|&a, &b| {
            candidates[b]
                .score
                .total_cmp(&candidates[a].score)
                .then_with(|| candidates[a].start_time().total_cmp(&candidates[b].start_time()))
                .then_with(|| candidates[a].id().cmp(candidates[b].id()))
        });

        if mood == Mood::Neutral {
            return by_score;
        }

        let mut ranked = Vec::with_capacity(by_score.len());
        let mut cluster: Vec<usize> = Vec::new();

        for index in by_score {
            if let Some(&head) = cluster.first() {
                if candidates[head].score - candidates[index].score >= tie_threshold {
                    Self::order_cluster(candidates, &mut cluster, mood);
                    ranked.append(&mut cluster);
                }
            }
            cluster.push(index);
        }
        Self::order_cluster(candidates, &mut cluster, mood);
        ranked.append(&mut cluster);

        ranked
    }

    fn order_cluster(candidates: &[ScoredSegment], cluster: &mut [usize], mood: Mood) {
        // Stable sort: equal durations keep their score order
        cluster.sort_by(|&a, &b| {
            let (da, db) = (candidates[a].duration(), candidates[b].duration());
            match mood {
                Mood::Energetic => da.total_cmp(&db),
                Mood::Calm => db.total_cmp(&da),
                Mood::Neutral => std::cmp::Ordering::Equal,
            }
        });
    }
}

impl Default for GreedySelector {
    fn default() -> Self {
        Self::new()
    }
}

impl Selector for GreedySelector {
    fn name(&self) -> &str {
        "greedy"
    }

    fn description(&self) -> &str {
        "Highest score first until the target duration is filled"
    }

    fn select(&self, scored: &[ScoredSegment], config: &Config) -> Selection {
        let target = config.edit.target_duration;
        let overflow = config.tuning.overflow_factor;
        let limit = target * overflow;
        let stop_at = target * config.tuning.early_stop_ratio;

        let mut ledger = SelectionLedger::new(scored);
        let eligible = ledger.filter_short(config.edit.min_segment_duration);
        let available = ledger.duration_of(&eligible);
        let order = self.rank(
            ledger.candidates(),
            eligible,
            config.edit.mood,
            config.tuning.tie_break_threshold,
        );

        for (position, &index) in order.iter().enumerate() {
            if ledger.accumulated() >= stop_at {
                let reason = format!(
                    "not evaluated: {:.1}s already reached {:.0}% of the {:.1}s target",
                    ledger.accumulated(),
                    config.tuning.early_stop_ratio * 100.0,
                    target
                );
                for &skipped in &order[position..] {
                    ledger.reject(skipped, reason.clone());
                }
                break;
            }

            if ledger.fits(index, limit) {
                let duration = ledger.candidate(index).duration();
                ledger.accept(
                    index,
                    format!(
                        "selected at rank {}: accumulated {:.1}s of {:.1}s target",
                        position + 1,
                        ledger.accumulated() + duration,
                        target
                    ),
                );
            } else {
                let candidate = ledger.candidate(index);
                let reason = format!(
                    "adding {:.1}s would reach {:.1}s, over the {:.1}s limit ({:.0}% overflow)",
                    candidate.duration(),
                    ledger.accumulated() + candidate.duration(),
                    limit,
                    (overflow - 1.0) * 100.0
                );
                ledger.reject(index, reason);
            }
        }

        ledger.flag_insufficient_content(available, target);
        ledger.annotate_neighbors();

        let accumulated = ledger.accumulated();
        let selection = ledger.finish();
        debug!(
            "Greedy selection ({} mood): {} of {} segments, {:.1}s of {:.1}s",
            config.edit.mood,
            selection.selected.len(),
            scored.len(),
            accumulated,
            target
        );

        selection
    }
}
