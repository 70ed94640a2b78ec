//! Pattern spectrum filtering.
//!
//! - `surrogates`: randomized copies of the data and the per-trial random source.
//! - `estimator`: parallel null-model estimation of the spectrum.
//! - `border`: detection border extraction.
//! - `filter`: dropping patterns below the border.

pub mod border;
pub mod estimator;
pub mod filter;
pub mod surrogates;
pub mod types;

pub use border::DetectionBorder;
pub use estimator::{NullModelEstimator, SpectrumEstimate};
pub use filter::filter_patterns;
pub use surrogates::{
    for_method, IdentitySurrogate, RandomSource, RandomSurrogate, ShuffleSurrogate,
    SurrogateGenerator, SwapSurrogate,
};
pub use types::{PatternSpectrum, SpectrumEntry};
