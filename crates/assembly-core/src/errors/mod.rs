//! Error handling for the assembly engine.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod estimation_error;
pub mod mining_error;
pub mod pipeline_error;

pub use config_error::ConfigError;
pub use error_code::AssemblyErrorCode;
pub use estimation_error::EstimationError;
pub use mining_error::MiningError;
pub use pipeline_error::{PipelineError, PipelineResult};
