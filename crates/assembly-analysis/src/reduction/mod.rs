//! Pattern set reduction.
//!
//! - `preference`: pairwise rules deciding between a pattern and its subset.
//! - `reducer`: the pass over all overlapping pairs, with optional synthesis
//!   of virtual intersection patterns.

pub mod preference;
pub mod reducer;

pub use preference::{prefer, Preference};
pub use reducer::reduce;
