//! # Template Scoring
//!
//! Configuration-driven rule set. Every boost and penalty is read from
//! `[strategy.parameters]`, so a template can be tuned without code changes.

mod scorer;

pub use scorer::TemplateScorer;

// Template parameter keys
pub const BASE_SCORE: &str = "base_score";
pub const HIGH_ENERGY_THRESHOLD: &str = "high_energy_threshold";
pub const HIGH_ENERGY_BOOST: &str = "high_energy_boost";
pub const LOW_ENERGY_PENALTY: &str = "low_energy_penalty";
pub const KEYWORD_BOOST: &str = "keyword_boost";
pub const SPEECH_BOOST: &str = "speech_boost";
pub const SCENE_CHANGE_BOOST: &str = "scene_change_boost";
pub const SPLIT_LENGTH: &str = "split_length";

// Weight keys recorded in every trace
pub const WEIGHT_BASE: &str = "base";
pub const WEIGHT_ENERGY: &str = "energyBoost";
pub const WEIGHT_KEYWORD: &str = "keywordBoost";
pub const WEIGHT_SPEECH: &str = "speechBoost";
pub const WEIGHT_SCENE: &str = "sceneChangeBoost";
pub const WEIGHT_SILENCE: &str = "silencePenalty";
