//! Null-model estimation errors.

use super::error_code::{self, AssemblyErrorCode};
use super::MiningError;

/// Errors that can occur while estimating a pattern spectrum.
#[derive(Debug, thiserror::Error)]
pub enum EstimationError {
    #[error("Estimation cancelled after {completed} of {requested} trials")]
    Cancelled { completed: u64, requested: u64 },

    #[error("No surrogate trials requested and no pattern spectrum supplied")]
    NoSpectrum,

    #[error("Surrogate mining failed: {0}")]
    Mining(#[from] MiningError),
}

impl AssemblyErrorCode for EstimationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Cancelled { .. } => error_code::CANCELLED,
            Self::NoSpectrum => error_code::NO_SPECTRUM,
            Self::Mining(_) => error_code::ESTIMATION_ERROR,
        }
    }
}
