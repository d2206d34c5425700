use tracing::debug;

use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::segmentation::types::Segment;
use crate::signal::types::NormalizedTimeline;

/// Slack applied when counting max-duration chunks, so float noise in
/// `duration / max` never adds a sliver chunk
const CHUNK_EPSILON: f64 = 1e-9;

/// Upper bound on chunks produced from one interval
pub const MAX_CHUNKS: usize = 100_000;

/// Cuts a normalized timeline into contiguous candidate segments
#[derive(Debug, Clone)]
pub struct Segmenter {
    min_duration: f64,
    max_duration: f64,
    silence_threshold: f64,
}

impl Segmenter {
    /// Create a segmenter with the default 0.1 silence threshold
    pub fn new(min_duration: f64, max_duration: f64) -> Self {
        Self {
            min_duration,
            max_duration,
            silence_threshold: 0.1,
        }
    }

    /// Create a segmenter from the edit and tuning settings
    pub fn with_config(config: &Config) -> Self {
        Self {
            min_duration: config.edit.min_segment_duration,
            max_duration: config.edit.max_segment_duration,
            silence_threshold: config.tuning.silence_threshold,
        }
    }

    /// Segment `timeline` into non-overlapping segments covering
    /// `[0, total_duration]` exactly once
    pub fn segment(&self, timeline: &NormalizedTimeline, source_id: &str) -> Result<Vec<Segment>> {
        self.validate()?;
        timeline.validate()?;

        if timeline.total_duration <= 0.0 {
            debug!("'{}' has zero duration, no segments", source_id);
            return Ok(Vec::new());
        }

        let cuts = self.detect_cuts(timeline);
        let segments = self.enforce_max_duration(&cuts, source_id)?;

        debug!(
            "Segmented '{}': {} cut points -> {} segments",
            source_id,
            cuts.len(),
            segments.len()
        );

        Ok(segments)
    }

    /// Phase A: place cuts on silence or scene changes at least
    /// `min_duration` apart, then close the timeline at `total_duration`
    fn detect_cuts(&self, timeline: &NormalizedTimeline) -> Vec<f64> {
        let total = timeline.total_duration;
        let mut cuts = vec![0.0];
        let mut last_cut = 0.0;

        for point in &timeline.time_points {
            if point.time >= total {
                break;
            }

            let spaced = point.time - last_cut >= self.min_duration;
            let boundary = point.audio_energy < self.silence_threshold || point.is_scene_change;

            if spaced && boundary {
                cuts.push(point.time);
                last_cut = point.time;
            }
        }

        if total - last_cut >= self.min_duration {
            cuts.push(total);
        } else if cuts.len() > 1 {
            // Fold the short tail into the previous segment
            cuts.pop();
            cuts.push(total);
        } else {
            cuts.push(total);
        }

        cuts
    }

    /// Phase B: split intervals longer than `max_duration` into equal chunks
    fn enforce_max_duration(&self, cuts: &[f64], source_id: &str) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();

        for window in cuts.windows(2) {
            for (start, end) in equal_chunks(window[0], window[1], self.max_duration)? {
                segments.push(Segment::new(source_id, segments.len() + 1, start, end));
            }
        }

        Ok(segments)
    }

    fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.min_duration) || !positive(self.max_duration) || self.min_duration > self.max_duration {
            return Err(ConfigError::InvalidValue {
                key: "edit.segment_duration_range".to_string(),
                value: format!("{}-{}", self.min_duration, self.max_duration),
            }
            .into());
        }

        Ok(())
    }
}

/// Split `[start, end)` into `ceil(len / max_len)` equal-width chunks
///
/// The final chunk ends exactly at `end`. Fails when more than
/// [`MAX_CHUNKS`] chunks would be needed.
pub fn equal_chunks(start: f64, end: f64, max_len: f64) -> Result<Vec<(f64, f64)>> {
    let duration = end - start;
    if duration <= max_len {
        return Ok(vec![(start, end)]);
    }

    let num_chunks = ((duration / max_len) - CHUNK_EPSILON).ceil().max(1.0);
    if num_chunks > MAX_CHUNKS as f64 {
        return Err(ConfigError::TooManyChunks {
            length: duration,
            max_len,
            limit: MAX_CHUNKS,
        }
        .into());
    }
    let num_chunks = num_chunks as usize;
    let width = duration / num_chunks as f64;

    Ok((0..num_chunks)
        .map(|k| {
            let chunk_start = start + k as f64 * width;
            let chunk_end = if k + 1 == num_chunks {
                end
            } else {
                start + (k + 1) as f64 * width
            };
            (chunk_start, chunk_end)
        })
        .collect())
}
