//! Null-model estimation: mine many surrogates, histogram their signatures.
//!
//! Trials are split into contiguous chunks, one per worker of a dedicated
//! rayon pool. Every trial seeds its own stream from `(seed, trial index)`,
//! and the per-worker counts are integers merged after all workers joined,
//! so the resulting spectrum does not depend on the worker count.

use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use assembly_core::errors::EstimationError;
use assembly_core::types::collections::FxHashMap;
use assembly_core::{stop_requested, CancellationToken, RandomDensity};
use rayon::prelude::*;

use super::surrogates::{RandomSource, SurrogateGenerator};
use super::types::PatternSpectrum;
use crate::data::{Item, TransactionDb};
use crate::mining::{Eclat, Signature};

/// Result of one estimation run.
#[derive(Debug, Clone, Default)]
pub struct SpectrumEstimate {
    /// Signature frequencies normalized by the number of trials.
    pub spectrum: PatternSpectrum,
    pub trials: u64,
    pub workers_requested: usize,
    pub workers_used: usize,
    pub elapsed_ms: u64,
}

impl SpectrumEstimate {
    /// True when fewer workers ran than were requested.
    pub fn is_degraded(&self) -> bool {
        self.workers_used < self.workers_requested
    }
}

/// Estimates the pattern spectrum of a surrogate null model.
pub struct NullModelEstimator<I: Item> {
    generator: Box<dyn SurrogateGenerator<I>>,
    eclat: Eclat,
    trials: u64,
    seed: u64,
    workers: usize,
    density: RandomDensity,
    sigma: f64,
    block_size: f64,
    progress: Arc<AtomicU64>,
}

impl<I: Item> NullModelEstimator<I> {
    /// `eclat` carries the surrogate target, minimum support and size bounds.
    pub fn new(generator: Box<dyn SurrogateGenerator<I>>, eclat: Eclat) -> Self {
        Self {
            generator,
            eclat,
            trials: 1000,
            seed: 1,
            workers: 1,
            density: RandomDensity::Uniform,
            sigma: 0.005,
            block_size: 0.03,
            progress: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_trials(mut self, trials: u64) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_density(mut self, density: RandomDensity, sigma: f64) -> Self {
        self.density = density;
        self.sigma = sigma;
        self
    }

    pub fn with_block_size(mut self, block_size: f64) -> Self {
        self.block_size = block_size;
        self
    }

    /// Shared counter of completed trials, advisory only.
    pub fn progress(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.progress)
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Run all trials and return the normalized spectrum.
    ///
    /// The token is checked before every trial. Zero trials yield an empty
    /// spectrum without touching the data.
    pub fn estimate(
        &self,
        db: &TransactionDb<I>,
        cancel: Option<&CancellationToken>,
    ) -> Result<SpectrumEstimate, EstimationError> {
        let start = Instant::now();
        self.progress.store(0, Ordering::Relaxed);
        if self.trials == 0 {
            tracing::debug!("no surrogate trials requested");
            return Ok(SpectrumEstimate::default());
        }

        let requested = self
            .workers
            .min(usize::try_from(self.trials).unwrap_or(usize::MAX));
        let (local_counts, workers_used) = match build_pool(requested) {
            Some((pool, n)) => {
                let chunks = partition(self.trials, n);
                let counts = pool.install(|| {
                    chunks
                        .into_par_iter()
                        .map(|range| self.run_chunk(db, range, cancel))
                        .collect::<Result<Vec<_>, _>>()
                })?;
                (counts, n)
            }
            None => (vec![self.run_chunk(db, 0..self.trials, cancel)?], 1),
        };

        let mut merged: FxHashMap<Signature, u64> = FxHashMap::default();
        for counts in local_counts {
            for (sig, n) in counts {
                *merged.entry(sig).or_insert(0) += n;
            }
        }
        let spectrum = PatternSpectrum::from_counts(&merged, self.trials);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if workers_used < requested {
            tracing::warn!(
                requested,
                workers_used,
                "worker pool degraded, estimation ran with fewer workers"
            );
        }
        tracing::info!(
            surrogate = self.generator.name(),
            trials = self.trials,
            workers_used,
            signatures = spectrum.len(),
            elapsed_ms,
            "pattern spectrum estimated"
        );

        Ok(SpectrumEstimate {
            spectrum,
            trials: self.trials,
            workers_requested: requested,
            workers_used,
            elapsed_ms,
        })
    }

    fn run_chunk(
        &self,
        db: &TransactionDb<I>,
        trials: Range<u64>,
        cancel: Option<&CancellationToken>,
    ) -> Result<FxHashMap<Signature, u64>, EstimationError> {
        let mut local: FxHashMap<Signature, u64> = FxHashMap::default();
        for trial in trials {
            if stop_requested(cancel) {
                return Err(EstimationError::Cancelled {
                    completed: self.progress.load(Ordering::Relaxed),
                    requested: self.trials,
                });
            }
            let mut random = RandomSource::new(self.seed, trial, self.density, self.sigma)
                .with_block_size(self.block_size);
            let surrogate = self.generator.generate(db, &mut random)?;
            for (sig, n) in self.eclat.mine_signatures(&surrogate)? {
                *local.entry(sig).or_insert(0) += n;
            }
            self.progress.fetch_add(1, Ordering::Relaxed);
        }
        Ok(local)
    }
}

/// Build a pool of `requested` threads, halving on failure.
/// `None` means run inline on the calling thread.
fn build_pool(requested: usize) -> Option<(rayon::ThreadPool, usize)> {
    let mut n = requested;
    while n > 1 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .thread_name(|i| format!("assembly-trial-{i}"))
            .build()
        {
            Ok(pool) => return Some((pool, n)),
            Err(e) => {
                tracing::warn!(workers = n, error = %e, "failed to build worker pool");
                n /= 2;
            }
        }
    }
    None
}

/// Split `0..trials` into `workers` contiguous ranges of near-equal size.
fn partition(trials: u64, workers: usize) -> Vec<Range<u64>> {
    let workers = workers.max(1) as u64;
    let (base, extra) = (trials / workers, trials % workers);
    let mut ranges = Vec::with_capacity(workers as usize);
    let mut start = 0;
    for w in 0..workers {
        let len = base + u64::from(w < extra);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::MiningParams;
    use crate::spectrum::surrogates::{IdentitySurrogate, SwapSurrogate};
    use assembly_core::MiningTarget;

    fn db() -> TransactionDb<u32> {
        TransactionDb::new(vec![
            vec![1, 2, 3, 4],
            vec![1, 2, 5],
            vec![2, 3, 6],
            vec![1, 4, 6],
            vec![3, 5, 7],
            vec![2, 4, 7],
            vec![1, 3, 5, 7],
            vec![4, 5, 6],
        ])
    }

    fn eclat() -> Eclat {
        Eclat::new(MiningParams::new(MiningTarget::All).with_min_support(2).with_sizes(2, 8)).unwrap()
    }

    #[test]
    fn test_partition_covers_all_trials() {
        let ranges = partition(10, 3);
        assert_eq!(ranges, vec![0..4, 4..7, 7..10]);
        assert_eq!(partition(2, 4).iter().map(|r| r.end - r.start).sum::<u64>(), 2);
    }

    #[test]
    fn test_identity_single_trial_matches_direct_mining() {
        let estimator = NullModelEstimator::new(Box::new(IdentitySurrogate), eclat()).with_trials(1);
        let estimate = estimator.estimate(&db(), None).unwrap();
        let direct = PatternSpectrum::from_counts(&eclat().mine_signatures(&db()).unwrap(), 1);
        assert_eq!(estimate.spectrum, direct);
        assert_eq!(estimator.progress().load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_spectrum_independent_of_worker_count() {
        let run = |workers| {
            NullModelEstimator::new(Box::new(SwapSurrogate), eclat())
                .with_trials(12)
                .with_seed(7)
                .with_workers(workers)
                .estimate(&db(), None)
                .unwrap()
                .spectrum
        };
        let single = run(1);
        assert_eq!(run(3), single);
        assert_eq!(run(4), single);
    }

    #[test]
    fn test_cancelled_before_first_trial() {
        let token = CancellationToken::new();
        token.cancel();
        let estimator = NullModelEstimator::new(Box::new(SwapSurrogate), eclat()).with_trials(5);
        match estimator.estimate(&db(), Some(&token)) {
            Err(EstimationError::Cancelled { completed, requested }) => {
                assert_eq!(completed, 0);
                assert_eq!(requested, 5);
            }
            other => panic!("Expected Cancelled, got: {:?}", other.map(|e| e.trials)),
        }
    }

    #[test]
    fn test_workers_capped_by_trials_are_not_degraded() {
        let estimate = NullModelEstimator::new(Box::new(SwapSurrogate), eclat())
            .with_trials(2)
            .with_workers(6)
            .estimate(&db(), None)
            .unwrap();
        assert_eq!(estimate.workers_requested, 2);
        assert!(!estimate.is_degraded());

        let short = SpectrumEstimate {
            workers_requested: 4,
            workers_used: 1,
            ..Default::default()
        };
        assert!(short.is_degraded());
    }

    #[test]
    fn test_zero_trials_is_empty() {
        let estimate = NullModelEstimator::new(Box::new(SwapSurrogate), eclat())
            .with_trials(0)
            .estimate(&db(), None)
            .unwrap();
        assert!(estimate.spectrum.is_empty());
        assert_eq!(estimate.trials, 0);
    }
}
