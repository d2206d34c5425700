//! # Edit Plan
//!
//! The output contract handed to renderers and explainability front ends:
//! chronological clips with transitions, output metadata, optional branding
//! and the full decision trace of every candidate segment.

pub mod builder;
pub mod types;

pub use builder::PlanBuilder;
pub use types::{Branding, Clip, EditPlan, PlanMetadata, Resolution, Transition, TransitionKind};
