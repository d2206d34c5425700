//! # Director Scoring
//!
//! The default rule set: a base score of 50 adjusted by audio energy, keyword
//! matches, content density and a silence penalty.

mod scorer;

pub use scorer::DirectorScorer;

// Weight keys recorded in every trace
pub const BASE: &str = "base";
pub const AUDIO_ENERGY: &str = "audioEnergy";
pub const KEYWORD_MATCH: &str = "keywordMatch";
pub const CONTENT_DENSITY: &str = "contentDensity";
pub const SILENCE_PENALTY: &str = "silencePenalty";

pub const BASE_SCORE: f64 = 50.0;
pub const AUDIO_ENERGY_CAP: f64 = 30.0;
pub const KEYWORD_BONUS: f64 = 20.0;
pub const DENSITY_CAP: f64 = 20.0;
pub const SILENCE_PENALTY_POINTS: f64 = -20.0;
