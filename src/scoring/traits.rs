use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::{Result, SignalError},
    segmentation::Segment,
    signal::NormalizedTimeline,
    trace::DecisionTrace,
};

/// Lowest and highest score a segment can carry
pub const SCORE_RANGE: (f64, f64) = (0.0, 100.0);

/// A segment with its bounded score and the trace explaining it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredSegment {
    #[serde(flatten)]
    pub segment: Segment,

    /// Quality score in `[0, 100]`
    pub score: f64,

    /// Audit trail accumulated by every stage so far
    pub explain: DecisionTrace,
}

impl ScoredSegment {
    pub fn new(segment: Segment, score: f64, explain: DecisionTrace) -> Self {
        Self { segment, score, explain }
    }

    pub fn id(&self) -> &str {
        &self.segment.id
    }

    pub fn start_time(&self) -> f64 {
        self.segment.start_time
    }

    pub fn duration(&self) -> f64 {
        self.segment.duration
    }

    /// The same segment carrying a replacement trace
    #[must_use]
    pub fn with_trace(self, explain: DecisionTrace) -> Self {
        Self { explain, ..self }
    }
}

/// Core trait that all scoring rule sets must implement
pub trait Scorer: Send + Sync {
    /// Returns the unique name of this scorer
    fn name(&self) -> &str;

    /// Returns a human-readable description of this scorer
    fn description(&self) -> &str;

    /// Reshape segments before scoring
    ///
    /// Rule sets that score better on shorter spans can split here. The result
    /// must still cover the same time range without gaps or overlaps.
    fn prepare(&self, segments: Vec<Segment>, config: &Config) -> Result<Vec<Segment>> {
        let _ = config;
        Ok(segments)
    }

    /// Compute an unclamped score and the trace explaining it
    ///
    /// Must be a pure function of its arguments.
    fn score(
        &self,
        segment: &Segment,
        timeline: &NormalizedTimeline,
        config: &Config,
    ) -> Result<(f64, DecisionTrace)>;

    /// Score a segment, clamping the result into [`SCORE_RANGE`]
    fn score_segment(
        &self,
        segment: &Segment,
        timeline: &NormalizedTimeline,
        config: &Config,
    ) -> Result<ScoredSegment> {
        segment.validate()?;

        let (raw, trace) = self.score(segment, timeline, config)?;
        if !raw.is_finite() {
            return Err(SignalError::InvalidSegment {
                id: segment.id.clone(),
                reason: format!("{} produced a non-finite score", self.name()),
            }
            .into());
        }

        let (low, high) = SCORE_RANGE;
        let score = raw.clamp(low, high);
        let trace = if score != raw {
            trace.with_reason(format!("raw score {:.1} clamped to {:.1}", raw, score))
        } else {
            trace
        };

        Ok(ScoredSegment::new(segment.clone(), score, trace))
    }

    /// Get scorer-specific metadata
    fn metadata(&self) -> ScorerMetadata {
        ScorerMetadata::default()
    }
}

/// Metadata about a scorer's contributions and parameters
#[derive(Debug, Clone, Default)]
pub struct ScorerMetadata {
    /// Keys this scorer always records in `DecisionTrace::weights`
    pub weight_keys: Vec<String>,

    /// List of optional parameters with descriptions
    pub optional_parameters: Vec<(String, String)>,
}
