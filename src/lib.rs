//! # Edit Director
//!
//! Deterministic auto-editing: turn per-media signal data (audio energy,
//! speech intervals, scene changes) into an explainable edit plan.
//!
//! Every candidate segment carries a decision trace recording why it scored
//! the way it did and why it was or was not selected, so the plan can be
//! audited after the fact.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edit_director::{config::Config, pipeline::PipelineEngine};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let mut config = Config::default();
//! config.edit.target_duration = 20.0;
//!
//! let engine = PipelineEngine::from_config(config)?;
//! let plan = engine.run_file("match-01.signal.json").await?;
//!
//! println!("{}", plan.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into one module per pipeline stage:
//!
//! - [`signal`] - Raw signal types, loading and normalization
//! - [`segmentation`] - Candidate segment detection
//! - [`scoring`] - Pluggable scoring rule sets
//! - [`selection`] - Pluggable selection strategies
//! - [`plan`] - Edit plan output and assembly
//! - [`pipeline`] - Engine chaining the stages together
//! - [`trace`] - Immutable decision traces
//! - [`config`] - Configuration management
//!
//! ## Custom Scorers
//!
//! Alternative rule sets implement the [`Scorer`](scoring::Scorer) trait and
//! register with a [`ScorerRegistry`](scoring::ScorerRegistry):
//!
//! ```rust,no_run
//! use edit_director::config::Config;
//! use edit_director::scoring::Scorer;
//! use edit_director::segmentation::Segment;
//! use edit_director::signal::NormalizedTimeline;
//! use edit_director::trace::DecisionTrace;
//!
//! struct FlatScorer;
//!
//! impl Scorer for FlatScorer {
//!     fn name(&self) -> &str {
//!         "flat"
//!     }
//!
//!     fn description(&self) -> &str {
//!         "Every segment scores 50"
//!     }
//!
//!     fn score(
//!         &self,
//!         _segment: &Segment,
//!         _timeline: &NormalizedTimeline,
//!         _config: &Config,
//!     ) -> edit_director::Result<(f64, DecisionTrace)> {
//!         Ok((50.0, DecisionTrace::new().with_weight("base", 50.0)))
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod plan;
pub mod scoring;
pub mod segmentation;
pub mod selection;
pub mod signal;
pub mod trace;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{DirectorError, Result},
    pipeline::{CancelFlag, PipelineEngine},
    plan::EditPlan,
    scoring::{Scorer, ScorerRegistry},
    selection::{Selector, SelectorRegistry},
    trace::DecisionTrace,
};
