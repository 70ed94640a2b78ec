//! Re-exports of performance-oriented collection types.

pub use rustc_hash::FxHashMap;
pub use smallvec::SmallVec;

/// SmallVec for item sets found by the miner (assemblies are usually small).
pub type SmallVec8<T> = SmallVec<[T; 8]>;
