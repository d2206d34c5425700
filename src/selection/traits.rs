use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{config::Config, scoring::ScoredSegment, trace::DecisionTrace};

/// Outcome of a selection pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Accepted segments, ascending by start time
    pub selected: Vec<ScoredSegment>,

    /// Every other candidate with its final trace, ascending by start time
    pub rejected: Vec<ScoredSegment>,
}

impl Selection {
    /// Sum of selected durations
    pub fn total_duration(&self) -> f64 {
        self.selected.iter().map(|s| s.duration()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn selected_ids(&self) -> Vec<&str> {
        self.selected.iter().map(|s| s.id()).collect()
    }

    /// Final traces of every candidate, keyed by segment id
    pub fn traces(&self) -> BTreeMap<String, DecisionTrace> {
        self.selected
            .iter()
            .chain(&self.rejected)
            .map(|s| (s.id().to_string(), s.explain.clone()))
            .collect()
    }
}

/// Core trait that all selection strategies must implement
pub trait Selector: Send + Sync {
    /// Returns the unique name of this selector
    fn name(&self) -> &str;

    /// Returns a human-readable description of this selector
    fn description(&self) -> &str;

    /// Choose a chronologically ordered subset of `scored`
    ///
    /// Must return identical output for identical input. Selecting nothing is
    /// a valid outcome, explained by the rejected candidates' traces.
    fn select(&self, scored: &[ScoredSegment], config: &Config) -> Selection;
}
