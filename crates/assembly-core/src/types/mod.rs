//! Shared data structures for the assembly engine.
//! FxHashMap/SmallVec aliases and the closed mode enumerations.

pub mod collections;
pub mod modes;

pub use collections::FxHashMap;
pub use modes::{MiningTarget, PreferenceRule, RandomDensity, SupportThreshold, SurrogateMethod};
