//! # Signal Module
//!
//! Consumes the signal data an upstream extractor computed for one media item
//! (audio energy over time, speech intervals, scene-change timestamps) and
//! aligns it onto a single fixed-step timeline for the later stages.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use edit_director::signal::{SignalLoader, SignalNormalizer};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let signal = SignalLoader::load("match-01.signal.json").await?;
//! let timeline = SignalNormalizer::new().normalize(&signal)?;
//!
//! println!("{} points over {:.1}s", timeline.len(), timeline.total_duration);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod normalizer;
pub mod types;

pub use loader::SignalLoader;
pub use normalizer::SignalNormalizer;
pub use types::{AudioSamples, NormalizedTimeline, RawSignal, SpeechInterval, TimePoint};
