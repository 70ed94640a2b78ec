//! Structured field names shared by the tracing events of all subsystems.
//!
//! Consistent names keep log queries stable across the miner, the
//! estimator and the reducer.

/// Miner: number of patterns reported.
pub const PATTERNS_FOUND: &str = "patterns_found";

/// Miner: wall time of one mining run in milliseconds.
pub const MINING_TIME: &str = "mining_time_ms";

/// Estimator: surrogate trials completed.
pub const TRIALS_COMPLETED: &str = "trials_completed";

/// Estimator: number of worker threads actually used.
pub const WORKERS_USED: &str = "workers_used";

/// Estimator: wall time of spectrum estimation in milliseconds.
pub const ESTIMATION_TIME: &str = "estimation_time_ms";

/// Spectrum: number of distinct signatures.
pub const SIGNATURES: &str = "signatures";

/// Reducer: patterns removed by the preference rule.
pub const PATTERNS_REDUCED: &str = "patterns_reduced";

/// Reducer: wall time of one reduction pass in milliseconds.
pub const REDUCTION_TIME: &str = "reduction_time_ms";
