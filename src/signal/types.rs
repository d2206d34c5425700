use serde::{Deserialize, Serialize};

use crate::error::{Result, SignalError};

/// Raw per-media signal data handed in by the upstream extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSignal {
    /// Identifier of the source media
    pub source_id: String,

    /// Total media duration in seconds
    pub total_duration: f64,

    /// Audio energy samples (0.0-1.0)
    #[serde(default)]
    pub audio: AudioSamples,

    /// Detected speech intervals, optionally with transcript text
    #[serde(default)]
    pub speech: Vec<SpeechInterval>,

    /// Scene-change timestamps in seconds
    #[serde(default)]
    pub scene_changes: Vec<f64>,
}

impl RawSignal {
    /// Create a signal with no samples, speech or scene changes
    pub fn new<S: Into<String>>(source_id: S, total_duration: f64) -> Self {
        Self {
            source_id: source_id.into(),
            total_duration,
            audio: AudioSamples::default(),
            speech: Vec::new(),
            scene_changes: Vec::new(),
        }
    }

    /// Attach audio energy samples
    pub fn with_audio(mut self, timestamps: Vec<f64>, energy: Vec<f64>) -> Self {
        self.audio = AudioSamples { timestamps, energy };
        self
    }

    /// Attach speech intervals
    pub fn with_speech(mut self, speech: Vec<SpeechInterval>) -> Self {
        self.speech = speech;
        self
    }

    /// Attach scene-change timestamps
    pub fn with_scene_changes(mut self, scene_changes: Vec<f64>) -> Self {
        self.scene_changes = scene_changes;
        self
    }

    /// Check the signal is well-formed before normalization
    pub fn validate(&self) -> Result<()> {
        if !self.total_duration.is_finite() || self.total_duration < 0.0 {
            return Err(SignalError::InvalidDuration {
                what: format!("source '{}'", self.source_id),
                value: self.total_duration,
            }
            .into());
        }

        self.audio.validate()?;

        for (index, interval) in self.speech.iter().enumerate() {
            let well_formed = interval.start.is_finite()
                && interval.end.is_finite()
                && interval.start >= 0.0
                && interval.start <= interval.end;
            if !well_formed {
                return Err(SignalError::InvalidSpeechInterval {
                    index,
                    start: interval.start,
                    end: interval.end,
                }
                .into());
            }
        }

        if let Some(index) = self.scene_changes.iter().position(|t| !t.is_finite()) {
            return Err(SignalError::NonFiniteValue {
                field: "sceneChanges".to_string(),
                index,
            }
            .into());
        }

        Ok(())
    }
}

/// Parallel arrays of sample timestamps and normalized energy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioSamples {
    /// Sample times in seconds, ascending
    pub timestamps: Vec<f64>,

    /// Energy per sample (0.0-1.0)
    pub energy: Vec<f64>,
}

impl AudioSamples {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Energy of the first sample at or after `time`, falling back to the
    /// last sample, or 0.0 without samples
    pub fn energy_at_or_after(&self, time: f64) -> f64 {
        if self.energy.is_empty() {
            return 0.0;
        }

        let index = self.timestamps.partition_point(|&ts| ts < time);
        self.energy
            .get(index)
            .or_else(|| self.energy.last())
            .copied()
            .unwrap_or(0.0)
    }

    fn validate(&self) -> Result<()> {
        if self.timestamps.len() != self.energy.len() {
            return Err(SignalError::LengthMismatch {
                left: "audio.timestamps".to_string(),
                left_len: self.timestamps.len(),
                right: "audio.energy".to_string(),
                right_len: self.energy.len(),
            }
            .into());
        }

        for (index, (&ts, &energy)) in self.timestamps.iter().zip(&self.energy).enumerate() {
            if !ts.is_finite() {
                return Err(SignalError::NonFiniteValue {
                    field: "audio.timestamps".to_string(),
                    index,
                }
                .into());
            }
            if !energy.is_finite() {
                return Err(SignalError::NonFiniteValue {
                    field: "audio.energy".to_string(),
                    index,
                }
                .into());
            }
            if !(0.0..=1.0).contains(&energy) {
                return Err(SignalError::OutOfRange {
                    field: "audio.energy".to_string(),
                    index,
                    value: energy,
                }
                .into());
            }
        }

        if let Some(index) = self.timestamps.windows(2).position(|pair| pair[1] < pair[0]) {
            return Err(SignalError::UnsortedTimestamps {
                field: "audio.timestamps".to_string(),
                index: index + 1,
            }
            .into());
        }

        Ok(())
    }
}

/// A detected speech interval, inclusive on both ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechInterval {
    pub start: f64,
    pub end: f64,

    /// Transcript text, if the extractor produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl SpeechInterval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end, text: None }
    }

    pub fn with_text<S: Into<String>>(start: f64, end: f64, text: S) -> Self {
        Self {
            start,
            end,
            text: Some(text.into()),
        }
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Whether the interval intersects the half-open range `[start, end)`
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.start < end && self.end >= start
    }
}

/// One fixed-step sample of the normalized timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePoint {
    pub time: f64,
    pub audio_energy: f64,
    pub is_speech: bool,
    pub is_scene_change: bool,
}

/// A raw signal resampled onto a fixed-step grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTimeline {
    /// Source this timeline was built from
    pub source_id: String,

    /// Sampling step in seconds
    pub step: f64,

    /// Ascending, first point at time 0
    pub time_points: Vec<TimePoint>,

    /// Total source duration in seconds
    pub total_duration: f64,

    /// Speech intervals that carry transcript text
    #[serde(default)]
    pub transcript: Vec<SpeechInterval>,
}

impl NormalizedTimeline {
    pub fn len(&self) -> usize {
        self.time_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_points.is_empty()
    }

    /// Points whose time lies in `[start, end)`
    pub fn points_in_range(&self, start: f64, end: f64) -> &[TimePoint] {
        let from = self.time_points.partition_point(|p| p.time < start);
        let to = self.time_points.partition_point(|p| p.time < end);
        &self.time_points[from..to.max(from)]
    }

    /// Last point at or before `time`
    pub fn point_at_or_before(&self, time: f64) -> Option<&TimePoint> {
        let index = self.time_points.partition_point(|p| p.time <= time);
        index.checked_sub(1).and_then(|i| self.time_points.get(i))
    }

    /// Mean audio energy over `[start, end)`
    ///
    /// Ranges narrower than the sampling step may contain no point; those use
    /// the energy of the point covering `start`.
    pub fn mean_energy(&self, start: f64, end: f64) -> f64 {
        let points = self.points_in_range(start, end);
        if points.is_empty() {
            return self
                .point_at_or_before(start)
                .map(|p| p.audio_energy)
                .unwrap_or(0.0);
        }

        points.iter().map(|p| p.audio_energy).sum::<f64>() / points.len() as f64
    }

    /// Transcript snippets overlapping `[start, end)`
    pub fn transcript_in_range(&self, start: f64, end: f64) -> impl Iterator<Item = &str> {
        self.transcript
            .iter()
            .filter(move |interval| interval.overlaps(start, end))
            .filter_map(|interval| interval.text.as_deref())
    }

    /// Check the timeline invariants: ascending, starting at 0, finite values
    pub fn validate(&self) -> Result<()> {
        if !self.total_duration.is_finite() || self.total_duration < 0.0 {
            return Err(SignalError::InvalidDuration {
                what: format!("timeline '{}'", self.source_id),
                value: self.total_duration,
            }
            .into());
        }

        let Some(first) = self.time_points.first() else {
            return Err(SignalError::InvalidTimeline {
                reason: "timeline has no points".to_string(),
            }
            .into());
        };

        if first.time != 0.0 {
            return Err(SignalError::InvalidTimeline {
                reason: format!("first point is at {}s instead of 0", first.time),
            }
            .into());
        }

        for (index, point) in self.time_points.iter().enumerate() {
            if !point.time.is_finite() || !point.audio_energy.is_finite() {
                return Err(SignalError::NonFiniteValue {
                    field: "timePoints".to_string(),
                    index,
                }
                .into());
            }
        }

        if let Some(index) = self.time_points.windows(2).position(|pair| pair[1].time <= pair[0].time) {
            return Err(SignalError::UnsortedTimestamps {
                field: "timePoints".to_string(),
                index: index + 1,
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline(energies: &[f64]) -> NormalizedTimeline {
        NormalizedTimeline {
            source_id: "test".to_string(),
            step: 1.0,
            time_points: energies
                .iter()
                .enumerate()
                .map(|(i, &e)| TimePoint {
                    time: i as f64,
                    audio_energy: e,
                    is_speech: false,
                    is_scene_change: false,
                })
                .collect(),
            total_duration: energies.len().saturating_sub(1) as f64,
            transcript: vec![],
        }
    }

    #[test]
    fn test_energy_lookup_at_or_after() {
        let audio = AudioSamples {
            timestamps: vec![0.0, 1.5, 3.0],
            energy: vec![0.2, 0.6, 0.9],
        };

        assert_eq!(audio.energy_at_or_after(0.0), 0.2);
        assert_eq!(audio.energy_at_or_after(1.0), 0.6);
        assert_eq!(audio.energy_at_or_after(3.0), 0.9);
        // Past the last sample falls back to it
        assert_eq!(audio.energy_at_or_after(10.0), 0.9);
        assert_eq!(AudioSamples::default().energy_at_or_after(1.0), 0.0);
    }

    #[test]
    fn test_signal_validation_rejects_bad_input() {
        assert!(RawSignal::new("a", -1.0).validate().is_err());
        assert!(RawSignal::new("a", f64::NAN).validate().is_err());

        let mismatched = RawSignal::new("a", 5.0).with_audio(vec![0.0, 1.0], vec![0.5]);
        assert!(mismatched.validate().is_err());

        let unsorted = RawSignal::new("a", 5.0).with_audio(vec![0.0, 2.0, 1.0], vec![0.1, 0.2, 0.3]);
        assert!(matches!(
            unsorted.validate(),
            Err(crate::DirectorError::Signal(SignalError::UnsortedTimestamps { index: 2, .. }))
        ));

        let loud = RawSignal::new("a", 5.0).with_audio(vec![0.0], vec![1.5]);
        assert!(loud.validate().is_err());

        let backwards = RawSignal::new("a", 5.0).with_speech(vec![SpeechInterval::new(3.0, 1.0)]);
        assert!(backwards.validate().is_err());

        assert!(RawSignal::new("a", 0.0).validate().is_ok());
    }

    #[test]
    fn test_points_in_range_is_half_open() {
        let tl = timeline(&[0.1, 0.2, 0.3, 0.4, 0.5]);
        let points = tl.points_in_range(1.0, 3.0);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].time, 1.0);
        assert_eq!(points[1].time, 2.0);
        assert!(tl.points_in_range(3.0, 3.0).is_empty());
    }

    #[test]
    fn test_mean_energy_with_narrow_range() {
        let tl = timeline(&[0.2, 0.4, 0.6]);
        assert!((tl.mean_energy(0.0, 2.0) - 0.3).abs() < 1e-12);
        // No point inside [1.2, 1.8): uses the point covering 1.2
        assert_eq!(tl.mean_energy(1.2, 1.8), 0.4);
    }

    #[test]
    fn test_timeline_validation() {
        assert!(timeline(&[0.1, 0.2]).validate().is_ok());

        let mut shifted = timeline(&[0.1, 0.2]);
        shifted.time_points[0].time = 0.5;
        assert!(shifted.validate().is_err());

        let mut unsorted = timeline(&[0.1, 0.2, 0.3]);
        unsorted.time_points[2].time = 0.5;
        assert!(unsorted.validate().is_err());

        let mut empty = timeline(&[]);
        empty.total_duration = 0.0;
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_transcript_overlap() {
        let mut tl = timeline(&[0.5; 10]);
        tl.transcript = vec![
            SpeechInterval::with_text(1.0, 2.5, "Kickoff"),
            SpeechInterval::with_text(6.0, 7.0, "Goal!"),
        ];

        let snippets: Vec<&str> = tl.transcript_in_range(2.0, 5.0).collect();
        assert_eq!(snippets, vec!["Kickoff"]);
    }
}
