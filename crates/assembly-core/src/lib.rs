//! Core infrastructure for the assembly detection engine.
//!
//! Everything the mining, spectrum and reduction subsystems share lives here:
//! the closed mode enumerations, one error enum per subsystem, the layered
//! configuration, cooperative cancellation and tracing setup.

pub mod config;
pub mod errors;
pub mod traits;
pub mod tracing;
pub mod types;

pub use config::AssemblyConfig;
pub use errors::{ConfigError, EstimationError, MiningError, PipelineError};
pub use traits::{stop_requested, Cancellable, CancellationToken};
pub use types::modes::{
    MiningTarget, PreferenceRule, RandomDensity, SupportThreshold, SurrogateMethod,
};
