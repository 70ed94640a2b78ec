//! Frequent item set mining.
//!
//! - `index`: vertical index builder (deduplication, posting lists, global
//!   perfect extensions).
//! - `eclat`: the depth-first search for all, closed and maximal item sets.
//! - `report`: size filtering, perfect-extension expansion and pattern sinks.

pub mod eclat;
pub mod index;
pub mod report;
pub mod types;

pub use eclat::Eclat;
pub use index::{Candidate, PostingList, VerticalIndex};
pub use report::{PatternCollector, PatternCounter, PatternSink, SignatureCounter};
pub use types::{MiningParams, Pattern, Signature, SizeBounds};
