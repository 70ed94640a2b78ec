//! Pattern spectrum: occurrence frequency per (size, support) signature.

use assembly_core::types::collections::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::mining::Signature;

/// One row of a persisted pattern spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumEntry {
    pub size: usize,
    pub support: u64,
    pub frequency: f64,
}

/// Mapping from signature to a raw count or a chance probability.
///
/// The estimator produces normalized spectra (counts divided by the number
/// of surrogate trials); supplied spectra are taken as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternSpectrum {
    frequencies: FxHashMap<Signature, f64>,
}

impl PatternSpectrum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize summed signature counts by the number of trials.
    pub fn from_counts(counts: &FxHashMap<Signature, u64>, trials: u64) -> Self {
        let norm = if trials > 0 { 1.0 / trials as f64 } else { 1.0 };
        let frequencies = counts
            .iter()
            .map(|(sig, &count)| (*sig, count as f64 * norm))
            .collect();
        Self { frequencies }
    }

    pub fn insert(&mut self, signature: Signature, frequency: f64) {
        self.frequencies.insert(signature, frequency);
    }

    /// Frequency of `signature`, 0 when absent.
    pub fn get(&self, signature: Signature) -> f64 {
        self.frequencies.get(&signature).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Signature, f64)> + '_ {
        self.frequencies.iter().map(|(sig, f)| (*sig, *f))
    }

    /// Largest pattern size with an entry, 0 for an empty spectrum.
    pub fn max_size(&self) -> usize {
        self.frequencies.keys().map(|s| s.size).max().unwrap_or(0)
    }

    /// Add the frequencies of `other`, signature by signature.
    pub fn merge(&mut self, other: &PatternSpectrum) {
        for (sig, f) in other.iter() {
            *self.frequencies.entry(sig).or_insert(0.0) += f;
        }
    }

    /// Drop entries whose frequency is below `min_frequency`.
    pub fn threshold(&self, min_frequency: f64) -> PatternSpectrum {
        let frequencies = self
            .frequencies
            .iter()
            .filter(|(_, f)| **f >= min_frequency)
            .map(|(sig, f)| (*sig, *f))
            .collect();
        PatternSpectrum { frequencies }
    }

    /// Entries sorted by (size, support).
    pub fn to_entries(&self) -> Vec<SpectrumEntry> {
        let mut entries: Vec<SpectrumEntry> = self
            .iter()
            .map(|(sig, frequency)| SpectrumEntry {
                size: sig.size,
                support: sig.support,
                frequency,
            })
            .collect();
        entries.sort_by(|a, b| (a.size, a.support).cmp(&(b.size, b.support)));
        entries
    }

    /// Build from entries; a repeated signature keeps its last frequency.
    pub fn from_entries<T: IntoIterator<Item = SpectrumEntry>>(entries: T) -> Self {
        let frequencies = entries
            .into_iter()
            .map(|e| (Signature::new(e.size, e.support), e.frequency))
            .collect();
        Self { frequencies }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_entries())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<SpectrumEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }
}

impl FromIterator<(Signature, f64)> for PatternSpectrum {
    fn from_iter<T: IntoIterator<Item = (Signature, f64)>>(iter: T) -> Self {
        Self {
            frequencies: iter.into_iter().collect(),
        }
    }
}
