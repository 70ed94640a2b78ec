//! Pattern spectrum (null model) configuration.

use serde::{Deserialize, Serialize};

use crate::types::modes::{MiningTarget, RandomDensity, SurrogateMethod};

/// Configuration for surrogate generation and spectrum estimation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SpectrumConfig {
    /// Surrogate data generation method. Default: swap.
    pub surrogate: Option<SurrogateMethod>,
    /// Target type for mining the surrogates. Default: all.
    pub surrogate_target: Option<MiningTarget>,
    /// Number of surrogate data sets. Default: 1000.
    /// Zero skips estimation; a spectrum must then be supplied.
    pub trials: Option<u64>,
    /// Seed for pseudo-random numbers. Default: 0 (derive from the clock).
    pub seed: Option<u64>,
    /// Number of worker threads. Default: 0 (available parallelism).
    pub workers: Option<usize>,
    /// Density of random displacements. Default: uniform.
    pub density: Option<RandomDensity>,
    /// Dispersion of the random density. Default: 0.005.
    pub sigma: Option<f64>,
    /// Block size for blocked permutations. Default: 0.03.
    pub block_size: Option<f64>,
    /// Spectrum entries with a lower frequency are ignored for the border.
    pub frequency_threshold: Option<f64>,
}

impl SpectrumConfig {
    pub fn effective_surrogate(&self) -> SurrogateMethod {
        self.surrogate.unwrap_or(SurrogateMethod::Swap)
    }

    pub fn effective_surrogate_target(&self) -> MiningTarget {
        self.surrogate_target.unwrap_or(MiningTarget::All)
    }

    /// Returns the effective trial count, defaulting to 1000.
    /// The identity surrogate always yields the same data, so one trial suffices.
    pub fn effective_trials(&self) -> u64 {
        let trials = self.trials.unwrap_or(1000);
        if trials > 0 && self.effective_surrogate() == SurrogateMethod::Identity {
            1
        } else {
            trials
        }
    }

    /// Returns the effective seed; 0 means "derive from the clock".
    pub fn effective_seed(&self) -> u64 {
        match self.seed.unwrap_or(0) {
            0 => std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(1),
            seed => seed,
        }
    }

    /// Returns the effective worker count; 0 means available parallelism.
    pub fn effective_workers(&self) -> usize {
        match self.workers.unwrap_or(0) {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        }
    }

    pub fn effective_density(&self) -> RandomDensity {
        self.density.unwrap_or(RandomDensity::Uniform)
    }

    pub fn effective_sigma(&self) -> f64 {
        self.sigma.unwrap_or(0.005)
    }

    pub fn effective_block_size(&self) -> f64 {
        self.block_size.unwrap_or(0.03)
    }
}
