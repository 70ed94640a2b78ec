//! Pipeline errors and non-fatal diagnostics collection.

use super::error_code::{self, AssemblyErrorCode};
use super::{ConfigError, EstimationError, MiningError};

/// Errors that can occur during a full detection run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mining error: {0}")]
    Mining(#[from] MiningError),

    #[error("Estimation error: {0}")]
    Estimation(#[from] EstimationError),

    #[error("Pipeline cancelled")]
    Cancelled,
}

impl AssemblyErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Mining(e) => e.error_code(),
            Self::Estimation(e) => e.error_code(),
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}

/// Result of a pipeline run that accumulates non-fatal warnings.
/// A worker pool smaller than requested is reported here.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal conditions collected during the run.
    pub warnings: Vec<String>,
}

impl<T: Default> PipelineResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            warnings: Vec::new(),
        }
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Returns true if there are no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}
