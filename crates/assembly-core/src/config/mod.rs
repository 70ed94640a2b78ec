//! Configuration system for the assembly engine.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod assembly_config;
pub mod mining_config;
pub mod reduction_config;
pub mod spectrum_config;

pub use assembly_config::{AssemblyConfig, ConfigOverrides};
pub use mining_config::MiningConfig;
pub use reduction_config::ReductionConfig;
pub use spectrum_config::SpectrumConfig;
