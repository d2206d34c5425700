use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    plan::types::{Branding, Resolution, Transition, TransitionKind},
};

/// Main configuration for the edit director
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// User-facing edit request
    #[serde(default)]
    pub edit: EditConfig,

    /// Heuristic constants used by the pipeline stages
    #[serde(default)]
    pub tuning: TuningConfig,

    /// Scorer/selector choice and their free-form parameters
    #[serde(default)]
    pub strategy: StrategyConfig,

    /// Output plan settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Batch execution settings
    #[serde(default)]
    pub batch: BatchConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string(),
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.edit.validate()?;
        self.tuning.validate()?;
        self.output.validate()?;
        self.batch.validate()?;
        Ok(())
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Editing mood, drives tie-breaking and transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Tighter pacing: shorter segments win ties, hard cuts
    Energetic,

    /// Slower pacing: longer segments win ties, fades
    Calm,

    /// Strict score order
    #[default]
    Neutral,
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mood::Energetic => "energetic",
            Mood::Calm => "calm",
            Mood::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

impl FromStr for Mood {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "energetic" => Ok(Mood::Energetic),
            "calm" => Ok(Mood::Calm),
            "neutral" => Ok(Mood::Neutral),
            other => Err(invalid("edit.mood", other)),
        }
    }
}

/// The user's edit request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Desired plan length in seconds
    pub target_duration: f64,

    /// Shortest segment the segmenter may cut (seconds)
    pub min_segment_duration: f64,

    /// Longest segment before equal-width splitting (seconds)
    pub max_segment_duration: f64,

    /// Keywords that boost matching segments (case-insensitive)
    pub keywords: Vec<String>,

    /// Pacing preference
    pub mood: Mood,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            target_duration: 30.0,
            min_segment_duration: 2.0,
            max_segment_duration: 10.0,
            keywords: Vec::new(),
            mood: Mood::Neutral,
        }
    }
}

impl EditConfig {
    fn validate(&self) -> Result<()> {
        if !self.target_duration.is_finite() || self.target_duration <= 0.0 {
            return Err(invalid("edit.target_duration", self.target_duration).into());
        }

        if !self.min_segment_duration.is_finite() || self.min_segment_duration <= 0.0 {
            return Err(invalid("edit.min_segment_duration", self.min_segment_duration).into());
        }

        if !self.max_segment_duration.is_finite() || self.max_segment_duration <= 0.0 {
            return Err(invalid("edit.max_segment_duration", self.max_segment_duration).into());
        }

        if self.min_segment_duration > self.max_segment_duration {
            return Err(invalid(
                "edit.segment_duration_range",
                format!("{}-{}", self.min_segment_duration, self.max_segment_duration),
            )
            .into());
        }

        Ok(())
    }
}

/// Named heuristic constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Normalized timeline step in seconds
    pub sample_step: f64,

    /// Mean energy below which a point/segment counts as silent
    pub silence_threshold: f64,

    /// Half-width of the scene-change matching window (seconds)
    pub scene_change_tolerance: f64,

    /// Allowed overshoot of the target duration during selection
    pub overflow_factor: f64,

    /// Fraction of the target at which selection stops scanning
    pub early_stop_ratio: f64,

    /// Score gap below which mood decides ordering
    pub tie_break_threshold: f64,

    /// Contributions smaller than this are weighted but not narrated
    pub materiality_threshold: f64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            sample_step: 1.0,
            silence_threshold: 0.1,
            scene_change_tolerance: 0.5,
            overflow_factor: 1.05,
            early_stop_ratio: 0.9,
            tie_break_threshold: 5.0,
            materiality_threshold: 5.0,
        }
    }
}

impl TuningConfig {
    fn validate(&self) -> Result<()> {
        if !self.sample_step.is_finite() || self.sample_step <= 0.0 {
            return Err(invalid("tuning.sample_step", self.sample_step).into());
        }

        if !(0.0..=1.0).contains(&self.silence_threshold) {
            return Err(invalid("tuning.silence_threshold", self.silence_threshold).into());
        }

        if !self.scene_change_tolerance.is_finite() || self.scene_change_tolerance < 0.0 {
            return Err(invalid("tuning.scene_change_tolerance", self.scene_change_tolerance).into());
        }

        if !self.overflow_factor.is_finite() || self.overflow_factor < 1.0 {
            return Err(invalid("tuning.overflow_factor", self.overflow_factor).into());
        }

        if !(self.early_stop_ratio > 0.0 && self.early_stop_ratio <= 1.0) {
            return Err(invalid("tuning.early_stop_ratio", self.early_stop_ratio).into());
        }

        if !self.tie_break_threshold.is_finite() || self.tie_break_threshold < 0.0 {
            return Err(invalid("tuning.tie_break_threshold", self.tie_break_threshold).into());
        }

        if !self.materiality_threshold.is_finite() || self.materiality_threshold < 0.0 {
            return Err(invalid("tuning.materiality_threshold", self.materiality_threshold).into());
        }

        Ok(())
    }
}

/// Strategy selection plus the parameters alternative rule sets read
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Registered scorer name
    pub scorer: String,

    /// Registered selector name
    pub selector: String,

    /// Strategy-specific parameters
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            scorer: "director".to_string(),
            selector: "greedy".to_string(),
            parameters: BTreeMap::new(),
        }
    }
}

impl StrategyConfig {
    /// Set a parameter value
    pub fn set<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Get a parameter value as a float
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.parameters.get(key).and_then(|v| v.as_f64())
    }

    /// Get a parameter value as a boolean
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.parameters.get(key).and_then(|v| v.as_bool())
    }

    /// Get a parameter value with a default
    pub fn get_f64_or(&self, key: &str, default: f64) -> f64 {
        self.get_f64(key).unwrap_or(default)
    }
}

/// Flexible parameter value that can hold different types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(f) => Some(*f),
            ParamValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

/// Output plan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Frame rate the renderer should target
    pub fps: f64,

    /// Clip volume (0.0-1.0)
    pub volume: f64,

    /// Output resolution
    pub resolution: Resolution,

    /// Transition chosen per mood
    #[serde(default)]
    pub transitions: TransitionConfig,

    /// Optional branding assets
    #[serde(default)]
    pub branding: Branding,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            volume: 1.0,
            resolution: Resolution::default(),
            transitions: TransitionConfig::default(),
            branding: Branding::default(),
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(invalid("output.fps", self.fps).into());
        }

        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(invalid("output.resolution", self.resolution).into());
        }

        if !(0.0..=1.0).contains(&self.volume) {
            return Err(invalid("output.volume", self.volume).into());
        }

        if !self.transitions.fade_duration.is_finite() || self.transitions.fade_duration < 0.0 {
            return Err(invalid("output.transitions.fade_duration", self.transitions.fade_duration).into());
        }

        Ok(())
    }
}

/// Transition kind chosen for each mood
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub energetic: TransitionKind,
    pub calm: TransitionKind,
    pub neutral: TransitionKind,

    /// Duration of non-cut transitions (seconds)
    pub fade_duration: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            energetic: TransitionKind::Cut,
            calm: TransitionKind::Fade,
            neutral: TransitionKind::Cut,
            fade_duration: 0.5,
        }
    }
}

impl TransitionConfig {
    /// Resolve the transition placed between clips for a mood
    pub fn for_mood(&self, mood: Mood) -> Transition {
        let kind = match mood {
            Mood::Energetic => self.energetic,
            Mood::Calm => self.calm,
            Mood::Neutral => self.neutral,
        };

        let duration = match kind {
            TransitionKind::Cut => 0.0,
            _ => self.fade_duration,
        };

        Transition { kind, duration }
    }
}

/// Batch execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of worker threads for independent pipeline runs
    pub processing_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            processing_threads: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    fn validate(&self) -> Result<()> {
        if self.processing_threads == 0 {
            return Err(invalid("batch.processing_threads", self.processing_threads).into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let mut original_config = Config::default();
        original_config.edit.keywords = vec!["goal".to_string()];
        original_config.edit.mood = Mood::Calm;
        original_config.strategy = original_config.strategy.set("keyword_boost", 12.5);

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(loaded_config.edit.keywords, vec!["goal".to_string()]);
        assert_eq!(loaded_config.edit.mood, Mood::Calm);
        assert_eq!(loaded_config.strategy.get_f64("keyword_boost"), Some(12.5));
        assert_eq!(original_config.output.resolution, loaded_config.output.resolution);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [edit]
            target_duration = 15.0
            min_segment_duration = 3.0
            max_segment_duration = 8.0
            keywords = []
            mood = "energetic"
            "#,
        )
        .unwrap();

        assert_eq!(config.edit.mood, Mood::Energetic);
        assert_eq!(config.tuning.overflow_factor, 1.05);
        assert_eq!(config.strategy.scorer, "director");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strategy_parameters_keep_types() {
        let config: Config = toml::from_str(
            r#"
            [strategy]
            scorer = "template"

            [strategy.parameters]
            keyword_boost = 40
            high_energy_threshold = 0.7
            split = true
            label = "highlights"
            "#,
        )
        .unwrap();

        let strategy = &config.strategy;
        assert_eq!(strategy.selector, "greedy");
        assert_eq!(strategy.get_f64("keyword_boost"), Some(40.0));
        assert_eq!(strategy.get_f64_or("high_energy_threshold", 0.6), 0.7);
        assert_eq!(strategy.get_bool("split"), Some(true));
        assert_eq!(strategy.parameters["label"].as_str(), Some("highlights"));
        assert_eq!(strategy.get_f64_or("missing", 1.5), 1.5);
    }

    #[test]
    fn test_invalid_segment_range() {
        let mut config = Config::default();
        config.edit.min_segment_duration = 12.0;
        config.edit.max_segment_duration = 6.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_target_rejected() {
        let mut config = Config::default();
        config.edit.target_duration = 0.0;
        assert!(config.validate().is_err());

        config.edit.target_duration = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_overflow_factor() {
        let mut config = Config::default();
        config.tuning.overflow_factor = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mood_parsing() {
        assert_eq!("Energetic".parse::<Mood>().unwrap(), Mood::Energetic);
        assert_eq!(" calm ".parse::<Mood>().unwrap(), Mood::Calm);
        assert!("sleepy".parse::<Mood>().is_err());
    }

    #[test]
    fn test_transition_for_mood() {
        let transitions = TransitionConfig::default();

        let calm = transitions.for_mood(Mood::Calm);
        assert_eq!(calm.kind, TransitionKind::Fade);
        assert_eq!(calm.duration, 0.5);

        let energetic = transitions.for_mood(Mood::Energetic);
        assert_eq!(energetic.kind, TransitionKind::Cut);
        assert_eq!(energetic.duration, 0.0);
    }
}
