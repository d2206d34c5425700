use serde::{Deserialize, Serialize};

use crate::error::{Result, SignalError};

/// A candidate edit segment within one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Derived from the source id and an ordinal, stable across runs
    pub id: String,

    pub source_id: String,

    /// Start time in seconds
    pub start_time: f64,

    /// End time in seconds
    pub end_time: f64,

    /// `end_time - start_time`
    pub duration: f64,
}

impl Segment {
    /// Create the `ordinal`-th segment of a source (1-based)
    pub fn new<S: Into<String>>(source_id: S, ordinal: usize, start_time: f64, end_time: f64) -> Self {
        let source_id = source_id.into();
        Self {
            id: format!("{}-{:04}", source_id, ordinal),
            source_id,
            start_time,
            end_time,
            duration: end_time - start_time,
        }
    }

    /// Create a segment with an explicit id
    pub fn with_id<I: Into<String>, S: Into<String>>(id: I, source_id: S, start_time: f64, end_time: f64) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            start_time,
            end_time,
            duration: end_time - start_time,
        }
    }

    /// Check `duration = end - start > 0` with finite bounds
    pub fn validate(&self) -> Result<()> {
        let finite = self.start_time.is_finite() && self.end_time.is_finite() && self.duration.is_finite();
        if !finite || self.start_time < 0.0 {
            return Err(SignalError::InvalidSegment {
                id: self.id.clone(),
                reason: format!("bounds [{}, {}] are not valid times", self.start_time, self.end_time),
            }
            .into());
        }

        if self.duration <= 0.0 || (self.duration - (self.end_time - self.start_time)).abs() > 1e-9 {
            return Err(SignalError::InvalidSegment {
                id: self.id.clone(),
                reason: format!("duration {} does not match a positive span", self.duration),
            }
            .into());
        }

        Ok(())
    }
}
