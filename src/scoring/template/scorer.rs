use tracing::debug;

use crate::{
    config::{Config, StrategyConfig},
    error::Result,
    scoring::features::{SegmentFeatures, SPEECH_COVERAGE},
    scoring::traits::{Scorer, ScorerMetadata},
    segmentation::{equal_chunks, Segment},
    signal::NormalizedTimeline,
    trace::DecisionTrace,
};

use super::{
    BASE_SCORE, HIGH_ENERGY_BOOST, HIGH_ENERGY_THRESHOLD, KEYWORD_BOOST, LOW_ENERGY_PENALTY,
    SCENE_CHANGE_BOOST, SPEECH_BOOST, SPLIT_LENGTH, WEIGHT_BASE, WEIGHT_ENERGY, WEIGHT_KEYWORD,
    WEIGHT_SCENE, WEIGHT_SILENCE, WEIGHT_SPEECH,
};

/// Boost/penalty values resolved from strategy parameters
#[derive(Debug, Clone, PartialEq)]
struct TemplateRules {
    base_score: f64,
    high_energy_threshold: f64,
    high_energy_boost: f64,
    low_energy_penalty: f64,
    keyword_boost: f64,
    speech_boost: f64,
    scene_change_boost: f64,
}

impl TemplateRules {
    fn from_parameters(params: &StrategyConfig) -> Self {
        Self {
            base_score: params.get_f64_or(BASE_SCORE, 50.0),
            high_energy_threshold: params.get_f64_or(HIGH_ENERGY_THRESHOLD, 0.6),
            high_energy_boost: params.get_f64_or(HIGH_ENERGY_BOOST, 25.0),
            low_energy_penalty: params.get_f64_or(LOW_ENERGY_PENALTY, 25.0),
            keyword_boost: params.get_f64_or(KEYWORD_BOOST, 30.0),
            speech_boost: params.get_f64_or(SPEECH_BOOST, 10.0),
            scene_change_boost: params.get_f64_or(SCENE_CHANGE_BOOST, 5.0),
        }
    }
}

/// Template-driven scorer with configurable boosts and length-based splitting
pub struct TemplateScorer;

impl TemplateScorer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TemplateScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Scorer for TemplateScorer {
    fn name(&self) -> &str {
        "template"
    }

    fn description(&self) -> &str {
        "Threshold rules with configurable energy, keyword, speech and scene boosts"
    }

    fn prepare(&self, segments: Vec<Segment>, config: &Config) -> Result<Vec<Segment>> {
        let Some(split_length) = config
            .strategy
            .get_f64(SPLIT_LENGTH)
            .filter(|len| len.is_finite() && *len > 0.0)
        else {
            return Ok(segments);
        };

        let before = segments.len();
        let mut prepared = Vec::with_capacity(before);
        for segment in segments {
            let chunks = equal_chunks(segment.start_time, segment.end_time, split_length)?;
            if chunks.len() == 1 {
                prepared.push(segment);
                continue;
            }

            for (k, (start, end)) in chunks.into_iter().enumerate() {
                prepared.push(Segment::with_id(
                    format!("{}.{}", segment.id, k + 1),
                    segment.source_id.clone(),
                    start,
                    end,
                ));
            }
        }

        debug!(
            "Template split at {:.1}s: {} segments -> {}",
            split_length,
            before,
            prepared.len()
        );

        Ok(prepared)
    }

    fn score(
        &self,
        segment: &Segment,
        timeline: &NormalizedTimeline,
        config: &Config,
    ) -> Result<(f64, DecisionTrace)> {
        let rules = TemplateRules::from_parameters(&config.strategy);
        let silence_threshold = config.tuning.silence_threshold;
        let features = SegmentFeatures::extract(segment, timeline, silence_threshold);

        let mut trace = DecisionTrace::new().with_weight(WEIGHT_BASE, rules.base_score);
        let mut score = rules.base_score;

        let energy = if features.mean_energy >= rules.high_energy_threshold {
            trace = trace.with_reason(format!(
                "energy {:.2} reaches the template threshold {:.2}, {:+.1}",
                features.mean_energy, rules.high_energy_threshold, rules.high_energy_boost
            ));
            rules.high_energy_boost
        } else {
            0.0
        };
        trace = trace.with_weight(WEIGHT_ENERGY, energy);
        score += energy;

        let keyword = match features.matched_keyword(&config.edit.keywords) {
            Some(keyword) => {
                trace = trace.with_reason(format!("keyword '{}' matched, {:+.1}", keyword, rules.keyword_boost));
                rules.keyword_boost
            }
            None => 0.0,
        };
        trace = trace.with_weight(WEIGHT_KEYWORD, keyword);
        score += keyword;

        let speech = if features.speech_ratio >= SPEECH_COVERAGE {
            trace = trace.with_reason(format!(
                "speech covers {:.0}% of the segment, {:+.1}",
                features.speech_ratio * 100.0,
                rules.speech_boost
            ));
            rules.speech_boost
        } else {
            0.0
        };
        trace = trace.with_weight(WEIGHT_SPEECH, speech);
        score += speech;

        let scene = if features.scene_changes > 0 {
            trace = trace.with_reason(format!(
                "{} scene change(s), {:+.1}",
                features.scene_changes, rules.scene_change_boost
            ));
            rules.scene_change_boost
        } else {
            0.0
        };
        trace = trace.with_weight(WEIGHT_SCENE, scene);
        score += scene;

        let silence = if features.mean_energy < silence_threshold {
            trace = trace.with_reason(format!(
                "energy {:.2} is below the silence threshold {:.2}, {:+.1}",
                features.mean_energy, silence_threshold, -rules.low_energy_penalty
            ));
            -rules.low_energy_penalty
        } else {
            0.0
        };
        trace = trace.with_weight(WEIGHT_SILENCE, silence);
        score += silence;

        Ok((score, trace))
    }

    fn metadata(&self) -> ScorerMetadata {
        ScorerMetadata {
            weight_keys: [WEIGHT_BASE, WEIGHT_ENERGY, WEIGHT_KEYWORD, WEIGHT_SPEECH, WEIGHT_SCENE, WEIGHT_SILENCE]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            optional_parameters: vec![
                (BASE_SCORE.to_string(), "Starting score (default 50)".to_string()),
                (HIGH_ENERGY_THRESHOLD.to_string(), "Mean energy that earns the boost (default 0.6)".to_string()),
                (HIGH_ENERGY_BOOST.to_string(), "Points for high-energy segments (default 25)".to_string()),
                (LOW_ENERGY_PENALTY.to_string(), "Points removed for silent segments (default 25)".to_string()),
                (KEYWORD_BOOST.to_string(), "Points for a keyword match (default 30)".to_string()),
                (SPEECH_BOOST.to_string(), "Points for mostly-speech segments (default 10)".to_string()),
                (SCENE_CHANGE_BOOST.to_string(), "Points for segments with a scene change (default 5)".to_string()),
                (SPLIT_LENGTH.to_string(), "Split segments longer than this before scoring (off by default)".to_string()),
            ],
        }
    }
}
