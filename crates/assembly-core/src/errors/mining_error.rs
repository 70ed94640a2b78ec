//! Mining errors.

use super::error_code::{self, AssemblyErrorCode};

/// Structural errors of the mining input. Empty or under-threshold data is
/// not an error: mining simply yields no patterns.
#[derive(Debug, thiserror::Error)]
pub enum MiningError {
    #[error("Invalid size bounds: min {min}, max {max}")]
    InvalidSizeBounds { min: usize, max: usize },

    #[error("Too many distinct transactions: {count} (max {max})")]
    TooManyTransactions { count: usize, max: usize },

    #[error("Data is not table-derived: {reason}")]
    NotTableDerived { reason: String },

    #[error("Surrogate generation failed ({method}): {reason}")]
    SurrogateFailed { method: &'static str, reason: String },
}

impl AssemblyErrorCode for MiningError {
    fn error_code(&self) -> &'static str {
        error_code::MINING_ERROR
    }
}
