//! # Selection
//!
//! Chooses which scored segments make the edit. Every candidate leaves this
//! stage with a final trace: selected segments say why they were kept and
//! which neighbours lost out, rejected ones carry `rejectedBecause`.
//!
//! ## Built-in Selectors
//!
//! - **greedy**: highest score first until the target is filled, with
//!   mood-aware tie-breaking
//! - **threshold**: chronological pass over segments scoring at least
//!   `min_score`

mod ledger;

pub mod greedy;
pub mod registry;
pub mod threshold;
pub mod traits;

pub use greedy::GreedySelector;
pub use registry::SelectorRegistry;
pub use threshold::ThresholdSelector;
pub use traits::{Selection, Selector};
