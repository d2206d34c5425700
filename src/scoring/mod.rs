//! # Scoring
//!
//! Assigns every candidate segment a bounded score in `[0, 100]` and a
//! [`DecisionTrace`](crate::trace::DecisionTrace) recording each named
//! contribution. Rule sets are pluggable through the [`Scorer`] trait.
//!
//! ## Built-in Scorers
//!
//! - **director**: base 50, audio energy (up to +30), keyword match (+20),
//!   content density (up to +20), silence penalty (-20)
//! - **template**: boosts and penalties read from `[strategy.parameters]`,
//!   with optional length-based splitting before scoring
//!
//! ## Usage
//!
//! ```rust,no_run
//! use edit_director::{config::Config, scoring::ScorerRegistry};
//! use edit_director::segmentation::Segment;
//! use edit_director::signal::{RawSignal, SignalNormalizer};
//!
//! # fn main() -> edit_director::Result<()> {
//! let config = Config::default();
//! let timeline = SignalNormalizer::new().normalize(&RawSignal::new("clip", 12.0))?;
//! let scorer = ScorerRegistry::new().resolve("director")?;
//!
//! let scored = scorer.score_segment(&Segment::new("clip", 1, 0.0, 6.0), &timeline, &config)?;
//! println!("{} scored {:.1}", scored.id(), scored.score);
//! # Ok(())
//! # }
//! ```

pub mod director;
pub mod features;
pub mod registry;
pub mod template;
pub mod traits;

pub use director::DirectorScorer;
pub use features::SegmentFeatures;
pub use registry::ScorerRegistry;
pub use template::TemplateScorer;
pub use traits::{ScoredSegment, Scorer, ScorerMetadata};
