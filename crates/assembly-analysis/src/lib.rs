//! Assembly detection: frequent pattern mining with pattern spectrum
//! filtering and pattern set reduction.
//!
//! - `data`: transaction databases and the item abstraction.
//! - `mining`: vertical index, eclat search, pattern reporting.
//! - `spectrum`: surrogates, null-model estimation, detection borders, filtering.
//! - `reduction`: preference rules and pattern set reduction.
//! - `pipeline`: the end-to-end run tying the three subsystems together.

pub mod data;
pub mod mining;
pub mod pipeline;
pub mod reduction;
pub mod spectrum;

pub use data::{Item, TransactionDb};
pub use mining::{Eclat, MiningParams, Pattern, Signature};
pub use pipeline::{AssemblyPipeline, PipelineDiagnostics, PipelineOutput};
pub use reduction::{reduce, Preference};
pub use spectrum::{DetectionBorder, NullModelEstimator, PatternSpectrum};
