//! # Segmentation
//!
//! Turns a normalized timeline into contiguous, non-overlapping candidate
//! segments. Cut points land on silence or scene changes no closer than the
//! minimum segment duration; anything longer than the maximum is split into
//! equal-width chunks.

pub mod segmenter;
pub mod types;

pub use segmenter::{equal_chunks, Segmenter};
pub use types::Segment;
