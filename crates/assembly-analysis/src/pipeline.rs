//! End-to-end assembly detection run.
//!
//! Stages: resolve support → obtain spectrum (estimate or supplied) →
//! threshold → border → mine → spectrum filter → reduce.

use std::time::Instant;

use assembly_core::config::AssemblyConfig;
use assembly_core::errors::{EstimationError, PipelineError, PipelineResult};
use assembly_core::tracing::metrics;
use assembly_core::{stop_requested, CancellationToken, PreferenceRule, SupportThreshold};
use serde::Serialize;

use crate::data::{Item, TransactionDb};
use crate::mining::{Eclat, MiningParams, Pattern};
use crate::reduction::reduce;
use crate::spectrum::{filter_patterns, for_method, DetectionBorder, NullModelEstimator, PatternSpectrum};

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput<I: Item> {
    /// Patterns that survived filtering and reduction, in canonical order.
    pub patterns: Vec<Pattern<I>>,
    /// The spectrum the border was derived from (after thresholding).
    pub spectrum: PatternSpectrum,
    pub border: DetectionBorder,
    pub diagnostics: PipelineDiagnostics,
}

impl<I: Item> Default for PipelineOutput<I> {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            spectrum: PatternSpectrum::default(),
            border: DetectionBorder::default(),
            diagnostics: PipelineDiagnostics::default(),
        }
    }
}

/// Per-stage counts and timings of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineDiagnostics {
    pub transactions: usize,
    /// Minimum support after resolving percentages.
    pub min_support: u64,
    /// Trials run by the estimator; 0 when the spectrum was supplied.
    pub trials: u64,
    pub workers_used: usize,
    pub signatures: usize,
    pub patterns_mined: usize,
    pub patterns_filtered: usize,
    pub patterns_reduced: usize,
    pub patterns_final: usize,
    pub estimation_ms: u64,
    pub mining_ms: u64,
    pub reduction_ms: u64,
}

impl PipelineDiagnostics {
    /// Flat JSON object keyed by the shared metric field names.
    pub fn to_json(&self) -> serde_json::Value {
        let fields: [(&str, u64); 12] = [
            (metrics::TRIALS_COMPLETED, self.trials),
            (metrics::WORKERS_USED, self.workers_used as u64),
            (metrics::ESTIMATION_TIME, self.estimation_ms),
            (metrics::SIGNATURES, self.signatures as u64),
            (metrics::PATTERNS_FOUND, self.patterns_mined as u64),
            (metrics::MINING_TIME, self.mining_ms),
            (metrics::PATTERNS_REDUCED, self.patterns_reduced as u64),
            (metrics::REDUCTION_TIME, self.reduction_ms),
            ("transactions", self.transactions as u64),
            ("min_support", self.min_support),
            ("patterns_filtered", self.patterns_filtered as u64),
            ("patterns_final", self.patterns_final as u64),
        ];
        let map: serde_json::Map<String, serde_json::Value> = fields
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.into()))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// Runs mining, spectrum filtering and reduction with one configuration.
#[derive(Debug, Clone)]
pub struct AssemblyPipeline {
    config: AssemblyConfig,
}

impl AssemblyPipeline {
    pub fn new(config: AssemblyConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(AssemblyConfig::default())
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Run every stage on `db`.
    ///
    /// With zero configured trials `spectrum` must be supplied; otherwise it
    /// is ignored and a fresh spectrum is estimated from surrogates.
    pub fn run<I: Item>(
        &self,
        db: &TransactionDb<I>,
        spectrum: Option<PatternSpectrum>,
        cancel: Option<&CancellationToken>,
    ) -> Result<PipelineResult<PipelineOutput<I>>, PipelineError> {
        AssemblyConfig::validate(&self.config)?;
        let mining = &self.config.mining;
        let mut result = PipelineResult::new(PipelineOutput::default());
        let mut diagnostics = PipelineDiagnostics {
            transactions: db.len(),
            ..Default::default()
        };

        // Surrogates have the same number of transactions, so the support
        // is resolved once and used as an absolute count from here on.
        let min_support = mining.effective_support().resolve(db.len());
        diagnostics.min_support = min_support;
        let support = SupportThreshold::Absolute(min_support);
        let (min_size, max_size) = (mining.effective_min_size(), mining.effective_max_size());

        // Stage 1: pattern spectrum
        let start = Instant::now();
        let spectrum = self.obtain_spectrum(db, spectrum, support, cancel, &mut result, &mut diagnostics)?;
        let spectrum = match self.config.spectrum.frequency_threshold {
            Some(min_frequency) => spectrum.threshold(min_frequency),
            None => spectrum,
        };
        diagnostics.estimation_ms = start.elapsed().as_millis() as u64;
        diagnostics.signatures = spectrum.len();
        let border = DetectionBorder::from_spectrum(&spectrum);

        if stop_requested(cancel) {
            return Err(PipelineError::Cancelled);
        }

        // Stage 2: mine the real data
        let start = Instant::now();
        let eclat = Eclat::new(
            MiningParams::new(mining.effective_target())
                .with_support(support)
                .with_sizes(min_size, max_size),
        )?;
        let patterns = eclat.mine(db)?;
        diagnostics.patterns_mined = patterns.len();
        diagnostics.mining_ms = start.elapsed().as_millis() as u64;

        // Stage 3: spectrum filter
        let patterns = filter_patterns(patterns, &border);
        diagnostics.patterns_filtered = diagnostics.patterns_mined - patterns.len();

        // Stage 4: pattern set reduction
        let start = Instant::now();
        let rule = self.config.reduction.effective_rule();
        let patterns = if rule == PreferenceRule::None {
            patterns
        } else {
            let before = patterns.len();
            let reduced = reduce(patterns, rule, &border, self.config.reduction.effective_synthesize());
            diagnostics.patterns_reduced = before - reduced.len();
            reduced
        };
        diagnostics.reduction_ms = start.elapsed().as_millis() as u64;
        diagnostics.patterns_final = patterns.len();

        tracing::info!(
            transactions = diagnostics.transactions,
            min_support,
            signatures = diagnostics.signatures,
            patterns_mined = diagnostics.patterns_mined,
            patterns_filtered = diagnostics.patterns_filtered,
            patterns_reduced = diagnostics.patterns_reduced,
            patterns_final = diagnostics.patterns_final,
            "assembly detection complete"
        );

        result.data = PipelineOutput {
            patterns,
            spectrum,
            border,
            diagnostics,
        };
        Ok(result)
    }

    fn obtain_spectrum<I: Item>(
        &self,
        db: &TransactionDb<I>,
        supplied: Option<PatternSpectrum>,
        support: SupportThreshold,
        cancel: Option<&CancellationToken>,
        result: &mut PipelineResult<PipelineOutput<I>>,
        diagnostics: &mut PipelineDiagnostics,
    ) -> Result<PatternSpectrum, PipelineError> {
        let config = &self.config.spectrum;
        let trials = config.effective_trials();
        if trials == 0 {
            return supplied.ok_or_else(|| EstimationError::NoSpectrum.into());
        }
        if supplied.is_some() {
            tracing::debug!(trials, "supplied spectrum ignored, estimating from surrogates");
        }

        let mining = &self.config.mining;
        let eclat = Eclat::new(
            MiningParams::new(config.effective_surrogate_target())
                .with_support(support)
                .with_sizes(mining.effective_min_size(), mining.effective_max_size()),
        )?;
        let estimator = NullModelEstimator::new(for_method(config.effective_surrogate()), eclat)
            .with_trials(trials)
            .with_seed(config.effective_seed())
            .with_workers(config.effective_workers())
            .with_density(config.effective_density(), config.effective_sigma())
            .with_block_size(config.effective_block_size());
        let estimate = estimator.estimate(db, cancel).map_err(|e| match e {
            EstimationError::Cancelled { .. } => PipelineError::Cancelled,
            other => other.into(),
        })?;

        if estimate.is_degraded() {
            result.add_warning(format!(
                "estimation ran with {} of {} requested workers",
                estimate.workers_used, estimate.workers_requested
            ));
        }
        diagnostics.trials = estimate.trials;
        diagnostics.workers_used = estimate.workers_used;
        Ok(estimate.spectrum)
    }
}
