use tracing::debug;

use crate::config::TuningConfig;
use crate::error::{Result, SignalError};
use crate::signal::types::{NormalizedTimeline, RawSignal, TimePoint};

/// Upper bound on samples per timeline (about 115 days at 1 Hz)
pub const MAX_TIME_POINTS: usize = 10_000_000;

/// Resamples raw signals onto a fixed-step timeline
#[derive(Debug, Clone)]
pub struct SignalNormalizer {
    step: f64,
    scene_change_tolerance: f64,
}

impl SignalNormalizer {
    /// Create a normalizer with the default 1 Hz step and ±0.5s scene window
    pub fn new() -> Self {
        Self::with_config(&TuningConfig::default())
    }

    /// Create a normalizer from tuning settings
    pub fn with_config(tuning: &TuningConfig) -> Self {
        Self {
            step: tuning.sample_step,
            scene_change_tolerance: tuning.scene_change_tolerance,
        }
    }

    /// Sample `signal` every `step` seconds from 0 to `ceil(total_duration)`
    ///
    /// Missing audio yields zero energy, missing speech/scene data yields
    /// `false` flags.
    pub fn normalize(&self, signal: &RawSignal) -> Result<NormalizedTimeline> {
        signal.validate()?;

        let steps = (signal.total_duration / self.step).ceil();
        if steps >= MAX_TIME_POINTS as f64 {
            return Err(SignalError::TooManyPoints {
                source_id: signal.source_id.clone(),
                points: steps + 1.0,
                limit: MAX_TIME_POINTS,
            }
            .into());
        }
        let steps = steps as usize;
        let time_points: Vec<TimePoint> = (0..=steps)
            .map(|i| {
                let time = i as f64 * self.step;
                TimePoint {
                    time,
                    audio_energy: signal.audio.energy_at_or_after(time),
                    is_speech: signal.speech.iter().any(|interval| interval.contains(time)),
                    is_scene_change: signal
                        .scene_changes
                        .iter()
                        .any(|&ts| (ts - time).abs() <= self.scene_change_tolerance),
                }
            })
            .collect();

        let transcript = signal
            .speech
            .iter()
            .filter(|interval| interval.text.is_some())
            .cloned()
            .collect();

        debug!(
            "Normalized '{}': {} points at {:.2}s step ({} speech, {} scene changes)",
            signal.source_id,
            time_points.len(),
            self.step,
            time_points.iter().filter(|p| p.is_speech).count(),
            time_points.iter().filter(|p| p.is_scene_change).count()
        );

        Ok(NormalizedTimeline {
            source_id: signal.source_id.clone(),
            step: self.step,
            time_points,
            total_duration: signal.total_duration,
            transcript,
        })
    }
}

impl Default for SignalNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::types::SpeechInterval;

    #[test]
    fn test_samples_cover_ceil_duration() {
        let signal = RawSignal::new("a", 4.2);
        let timeline = SignalNormalizer::new().normalize(&signal).unwrap();

        let times: Vec<f64> = timeline.time_points.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(timeline.total_duration, 4.2);
        assert!(timeline.validate().is_ok());
    }

    #[test]
    fn test_degenerate_signal_defaults() {
        let signal = RawSignal::new("empty", 3.0);
        let timeline = SignalNormalizer::new().normalize(&signal).unwrap();

        assert!(timeline
            .time_points
            .iter()
            .all(|p| p.audio_energy == 0.0 && !p.is_speech && !p.is_scene_change));
    }

    #[test]
    fn test_zero_duration_has_single_point() {
        let timeline = SignalNormalizer::new().normalize(&RawSignal::new("z", 0.0)).unwrap();
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.time_points[0].time, 0.0);
    }

    #[test]
    fn test_energy_speech_and_scene_alignment() {
        let signal = RawSignal::new("a", 4.0)
            .with_audio(vec![0.5, 2.0], vec![0.3, 0.8])
            .with_speech(vec![SpeechInterval::new(1.0, 2.0)])
            .with_scene_changes(vec![2.6]);

        let timeline = SignalNormalizer::new().normalize(&signal).unwrap();
        let points = &timeline.time_points;

        // Energy: first sample at or after t, else the last sample
        assert_eq!(points[0].audio_energy, 0.3);
        assert_eq!(points[1].audio_energy, 0.8);
        assert_eq!(points[4].audio_energy, 0.8);

        // Speech interval bounds are inclusive
        assert!(!points[0].is_speech);
        assert!(points[1].is_speech);
        assert!(points[2].is_speech);
        assert!(!points[3].is_speech);

        // 2.6 is within ±0.5s of 3.0 only
        assert!(!points[2].is_scene_change);
        assert!(points[3].is_scene_change);
    }

    #[test]
    fn test_custom_step_and_tolerance() {
        let tuning = TuningConfig {
            sample_step: 0.5,
            scene_change_tolerance: 0.1,
            ..TuningConfig::default()
        };
        let signal = RawSignal::new("a", 1.0).with_scene_changes(vec![0.55]);
        let timeline = SignalNormalizer::with_config(&tuning).normalize(&signal).unwrap();

        assert_eq!(timeline.len(), 3);
        assert!(timeline.time_points[1].is_scene_change);
        assert!(!timeline.time_points[2].is_scene_change);
    }

    #[test]
    fn test_invalid_signal_is_rejected() {
        let signal = RawSignal::new("bad", 3.0).with_audio(vec![0.0, 1.0], vec![0.2, f64::NAN]);
        assert!(SignalNormalizer::new().normalize(&signal).is_err());
    }

    #[test]
    fn test_oversized_timeline_is_rejected() {
        let signal = RawSignal::new("huge", 1e15);
        match SignalNormalizer::new().normalize(&signal) {
            Err(crate::DirectorError::Signal(SignalError::TooManyPoints { source_id, limit, .. })) => {
                assert_eq!(source_id, "huge");
                assert_eq!(limit, MAX_TIME_POINTS);
            }
            other => panic!("expected too many points, got {:?}", other),
        }

        let mut tuning = TuningConfig::default();
        tuning.sample_step = 1e-9;
        let result = SignalNormalizer::with_config(&tuning).normalize(&RawSignal::new("fine", 60.0));
        assert!(matches!(
            result,
            Err(crate::DirectorError::Signal(SignalError::TooManyPoints { .. }))
        ));
    }

    #[test]
    fn test_transcript_is_carried_over() {
        let signal = RawSignal::new("a", 5.0).with_speech(vec![
            SpeechInterval::new(0.0, 1.0),
            SpeechInterval::with_text(2.0, 3.0, "hello"),
        ]);
        let timeline = SignalNormalizer::new().normalize(&signal).unwrap();
        assert_eq!(timeline.transcript.len(), 1);
    }
}
