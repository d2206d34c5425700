//! # Pipeline Engine
//!
//! Chains normalization, segmentation, scoring, selection and plan building
//! into a single run per signal, with cancellation between stages and a
//! parallel batch driver for independent signals.

pub mod engine;

pub use engine::{BatchOutcome, CancelFlag, PipelineEngine};
