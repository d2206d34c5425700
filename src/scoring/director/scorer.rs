use tracing::debug;

use crate::{
    config::Config,
    error::Result,
    scoring::features::SegmentFeatures,
    scoring::traits::{Scorer, ScorerMetadata},
    segmentation::Segment,
    signal::NormalizedTimeline,
    trace::DecisionTrace,
};

use super::{
    AUDIO_ENERGY, AUDIO_ENERGY_CAP, BASE, BASE_SCORE, CONTENT_DENSITY, DENSITY_CAP, KEYWORD_BONUS,
    KEYWORD_MATCH, SILENCE_PENALTY, SILENCE_PENALTY_POINTS,
};

/// Multi-factor scorer with a fixed, explainable contribution table
pub struct DirectorScorer;

impl DirectorScorer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DirectorScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Scorer for DirectorScorer {
    fn name(&self) -> &str {
        "director"
    }

    fn description(&self) -> &str {
        "Base 50 plus audio energy, keyword and content density contributions, minus a silence penalty"
    }

    fn score(
        &self,
        segment: &Segment,
        timeline: &NormalizedTimeline,
        config: &Config,
    ) -> Result<(f64, DecisionTrace)> {
        let tuning = &config.tuning;
        let features = SegmentFeatures::extract(segment, timeline, tuning.silence_threshold);
        let material = |points: f64| points.abs() >= tuning.materiality_threshold;

        let mut trace = DecisionTrace::new().with_weight(BASE, BASE_SCORE);
        let mut score = BASE_SCORE;

        let energy_points = features.mean_energy * AUDIO_ENERGY_CAP;
        trace = trace.with_weight(AUDIO_ENERGY, energy_points);
        if material(energy_points) {
            trace = trace.with_reason(format!(
                "mean audio energy {:.2} adds {:+.1}",
                features.mean_energy, energy_points
            ));
        }
        score += energy_points;

        let keyword = features.matched_keyword(&config.edit.keywords);
        let keyword_points = if keyword.is_some() { KEYWORD_BONUS } else { 0.0 };
        trace = trace.with_weight(KEYWORD_MATCH, keyword_points);
        if let Some(keyword) = keyword {
            trace = trace.with_reason(format!("keyword '{}' matched, adds {:+.1}", keyword, keyword_points));
        }
        score += keyword_points;

        let (density, estimated) = features.content_density(segment);
        let density_points = density * DENSITY_CAP;
        trace = trace.with_weight(CONTENT_DENSITY, density_points);
        if material(density_points) {
            let origin = if estimated { "estimated" } else { "measured" };
            trace = trace.with_reason(format!(
                "{} content density {:.2} adds {:+.1}",
                origin, density, density_points
            ));
        }
        score += density_points;

        let silent = features.mean_energy < tuning.silence_threshold;
        let silence_points = if silent { SILENCE_PENALTY_POINTS } else { 0.0 };
        trace = trace.with_weight(SILENCE_PENALTY, silence_points);
        if silent {
            trace = trace.with_reason(format!(
                "mean audio energy {:.2} is below the silence threshold {:.2}, {:+.1}",
                features.mean_energy, tuning.silence_threshold, silence_points
            ));
        }
        score += silence_points;

        debug!(
            "Scored {} [{:.1}s-{:.1}s]: {:.1} (energy {:+.1}, keyword {:+.1}, density {:+.1}, silence {:+.1})",
            segment.id,
            segment.start_time,
            segment.end_time,
            score,
            energy_points,
            keyword_points,
            density_points,
            silence_points
        );

        Ok((score, trace))
    }

    fn metadata(&self) -> ScorerMetadata {
        ScorerMetadata {
            weight_keys: [BASE, AUDIO_ENERGY, KEYWORD_MATCH, CONTENT_DENSITY, SILENCE_PENALTY]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            optional_parameters: vec![],
        }
    }
}
