//! Bookkeeping shared by the selectors.

use std::collections::BTreeMap;

use tracing::warn;

use crate::{scoring::ScoredSegment, trace::DecisionTrace};

use super::traits::Selection;

/// Slack for duration comparisons
pub(crate) const DURATION_EPSILON: f64 = 1e-9;

/// Candidates in chronological order with the traces selection builds up
///
/// Input segments are never touched; each decision replaces the working
/// trace with an extended copy.
pub(crate) struct SelectionLedger {
    candidates: Vec<ScoredSegment>,
    traces: Vec<DecisionTrace>,
    accepted: Vec<bool>,
    accumulated: f64,
}

impl SelectionLedger {
    pub(crate) fn new(scored: &[ScoredSegment]) -> Self {
        let mut candidates = scored.to_vec();
        candidates.sort_by(|a, b| {
            a.start_time()
                .total_cmp(&b.start_time())
                .then_with(|| a.id().cmp(b.id()))
        });

        let traces = candidates.iter().map(|c| c.explain.clone()).collect();
        let accepted = vec![false; candidates.len()];

        Self {
            candidates,
            traces,
            accepted,
            accumulated: 0.0,
        }
    }

    pub(crate) fn candidates(&self) -> &[ScoredSegment] {
        &self.candidates
    }

    pub(crate) fn candidate(&self, index: usize) -> &ScoredSegment {
        &self.candidates[index]
    }

    pub(crate) fn accumulated(&self) -> f64 {
        self.accumulated
    }

    /// Reject candidates shorter than `min_duration` and return the rest
    ///
    /// A source's only candidate is kept even when short: it is the whole
    /// source.
    pub(crate) fn filter_short(&mut self, min_duration: f64) -> Vec<usize> {
        let mut per_source: BTreeMap<&str, usize> = BTreeMap::new();
        for candidate in &self.candidates {
            *per_source.entry(candidate.segment.source_id.as_str()).or_insert(0) += 1;
        }

        let short: Vec<bool> = self
            .candidates
            .iter()
            .map(|c| {
                c.duration() + DURATION_EPSILON < min_duration
                    && per_source.get(c.segment.source_id.as_str()).copied().unwrap_or(0) > 1
            })
            .collect();

        let mut eligible = Vec::with_capacity(self.candidates.len());
        for (index, is_short) in short.into_iter().enumerate() {
            if is_short {
                let reason = format!(
                    "duration {:.1}s is shorter than the {:.1}s minimum",
                    self.candidates[index].duration(),
                    min_duration
                );
                self.reject(index, reason);
            } else {
                eligible.push(index);
            }
        }

        eligible
    }

    /// Total duration of the given candidates
    pub(crate) fn duration_of(&self, indices: &[usize]) -> f64 {
        indices.iter().map(|&i| self.candidates[i].duration()).sum()
    }

    /// Whether adding `index` keeps the total within `limit`
    pub(crate) fn fits(&self, index: usize, limit: f64) -> bool {
        self.accumulated + self.candidates[index].duration() <= limit + DURATION_EPSILON
    }

    pub(crate) fn accept<S: Into<String>>(&mut self, index: usize, reason: S) {
        self.accepted[index] = true;
        self.accumulated += self.candidates[index].duration();
        self.note(index, reason);
    }

    pub(crate) fn reject<S: Into<String>>(&mut self, index: usize, reason: S) {
        self.traces[index] = self.traces[index].with_rejection(reason);
    }

    pub(crate) fn note<S: Into<String>>(&mut self, index: usize, reason: S) {
        self.traces[index] = self.traces[index].with_reason(reason);
    }

    /// Explain an underfilled selection on every accepted trace
    pub(crate) fn flag_insufficient_content(&mut self, available: f64, target: f64) {
        if available + DURATION_EPSILON >= target {
            return;
        }

        warn!(
            "Only {:.1}s of candidate content for a {:.1}s target; accepting everything that fits",
            available, target
        );

        let reason = format!(
            "only {:.1}s of content is available for the {:.1}s target",
            available, target
        );
        for index in 0..self.candidates.len() {
            if self.accepted[index] {
                self.note(index, reason.clone());
            }
        }
    }

    /// Note rejected chronological neighbours on each accepted candidate
    ///
    /// Reads the accept flags only; never changes them.
    pub(crate) fn annotate_neighbors(&mut self) {
        let count = self.candidates.len();
        for index in 0..count {
            if !self.accepted[index] {
                continue;
            }

            let neighbors = [index.checked_sub(1), Some(index + 1).filter(|&n| n < count)];
            for neighbor in neighbors.into_iter().flatten() {
                if self.accepted[neighbor] {
                    continue;
                }

                let reason = format!(
                    "neighbor {} (score {:.1}) was not selected",
                    self.candidates[neighbor].id(),
                    self.candidates[neighbor].score
                );
                self.note(index, reason);
            }
        }
    }

    pub(crate) fn finish(self) -> Selection {
        let mut selection = Selection::default();

        for ((candidate, trace), accepted) in self.candidates.into_iter().zip(self.traces).zip(self.accepted) {
            let candidate = candidate.with_trace(trace);
            if accepted {
                selection.selected.push(candidate);
            } else {
                selection.rejected.push(candidate);
            }
        }

        selection
    }
}
