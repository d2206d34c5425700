//! Append-only audit trail attached to every segment.
//!
//! A [`DecisionTrace`] is a value: every stage that wants to add to it gets a
//! new trace back and the previous one is left untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Why a segment scored and was (or was not) selected the way it was
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionTrace {
    /// Narrated reasons, in the order stages produced them
    pub reasons: Vec<String>,

    /// Named score contributions, keyed by stable names
    pub weights: BTreeMap<String, f64>,

    /// Reasons the segment was passed over, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_because: Option<Vec<String>>,
}

impl DecisionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this trace with `reason` appended
    #[must_use]
    pub fn with_reason<S: Into<String>>(&self, reason: S) -> Self {
        let mut next = self.clone();
        next.reasons.push(reason.into());
        next
    }

    /// A copy of this trace with `name` recorded as `value`
    ///
    /// Weight keys are write-once: recording an existing key again keeps the
    /// original value.
    #[must_use]
    pub fn with_weight<S: Into<String>>(&self, name: S, value: f64) -> Self {
        let mut next = self.clone();
        next.weights.entry(name.into()).or_insert(value);
        next
    }

    /// A copy of this trace with `reason` appended to `rejected_because`
    #[must_use]
    pub fn with_rejection<S: Into<String>>(&self, reason: S) -> Self {
        let mut next = self.clone();
        next.rejected_because
            .get_or_insert_with(Vec::new)
            .push(reason.into());
        next
    }

    pub fn weight(&self, name: &str) -> Option<f64> {
        self.weights.get(name).copied()
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected_because.as_ref().is_some_and(|r| !r.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appending_leaves_original_untouched() {
        let scored = DecisionTrace::new()
            .with_weight("audioEnergy", 18.0)
            .with_reason("strong audio");

        let selected = scored.with_reason("selected");
        let rejected = scored.with_rejection("would overshoot");

        assert_eq!(scored.reasons, vec!["strong audio".to_string()]);
        assert!(scored.rejected_because.is_none());
        assert_eq!(selected.reasons.len(), 2);
        assert_eq!(selected.weight("audioEnergy"), Some(18.0));
        assert!(rejected.is_rejected());
        assert!(!selected.is_rejected());
    }

    #[test]
    fn test_weights_are_write_once() {
        let trace = DecisionTrace::new()
            .with_weight("silencePenalty", -20.0)
            .with_weight("silencePenalty", 0.0);
        assert_eq!(trace.weight("silencePenalty"), Some(-20.0));
    }

    #[test]
    fn test_serializes_camel_case_without_empty_rejections() {
        let json = serde_json::to_string(&DecisionTrace::new().with_reason("ok")).unwrap();
        assert_eq!(json, r#"{"reasons":["ok"],"weights":{}}"#);

        let json = serde_json::to_string(&DecisionTrace::new().with_rejection("no")).unwrap();
        assert!(json.contains(r#""rejectedBecause":["no"]"#));
    }
}
