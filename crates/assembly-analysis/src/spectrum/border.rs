//! Detection border: minimum support per pattern size.

use serde::{Deserialize, Serialize};

use super::types::PatternSpectrum;

/// Minimum support a pattern of a given size needs to be considered
/// non-chance.
///
/// A border built from a spectrum always starts with two unbounded entries
/// (sizes 0 and 1) and never increases with size. Sizes beyond the end of
/// the border have threshold 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionBorder {
    thresholds: Vec<u64>,
}

impl DetectionBorder {
    /// Threshold value that no support reaches.
    pub const UNBOUNDED: u64 = u64::MAX;

    /// A border without constraints (every lookup reads 0).
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Use the given thresholds as they are.
    pub fn from_thresholds(thresholds: Vec<u64>) -> Self {
        Self { thresholds }
    }

    /// Running maximum of the chance support over all sizes `>= z`, plus one.
    pub fn from_spectrum(spectrum: &PatternSpectrum) -> Self {
        let max_size = spectrum.max_size();
        let mut per_size: Vec<Option<u64>> = vec![None; max_size + 1];
        for (sig, _) in spectrum.iter() {
            let slot = &mut per_size[sig.size];
            *slot = Some(slot.map_or(sig.support, |s| s.max(sig.support)));
        }

        let mut thresholds = vec![0u64; (max_size + 1).max(2)];
        let mut running: Option<u64> = None;
        for z in (0..=max_size).rev() {
            running = match (running, per_size[z]) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };
            thresholds[z] = running.map_or(0, |m| m.saturating_add(1));
        }
        thresholds[0] = Self::UNBOUNDED;
        thresholds[1] = Self::UNBOUNDED;
        Self { thresholds }
    }

    /// Threshold for `size`; 0 beyond the end of the border.
    pub fn threshold(&self, size: usize) -> u64 {
        self.thresholds.get(size).copied().unwrap_or(0)
    }

    /// Whether a pattern with this size and support clears the border.
    pub fn admits(&self, size: usize, support: u64) -> bool {
        size >= self.thresholds.len() || support >= self.thresholds[size]
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::Signature;

    fn spectrum(entries: &[(usize, u64)]) -> PatternSpectrum {
        entries
            .iter()
            .map(|&(z, c)| (Signature::new(z, c), 0.01))
            .collect()
    }

    #[test]
    fn test_border_is_running_maximum_plus_one() {
        let border = DetectionBorder::from_spectrum(&spectrum(&[(2, 9), (2, 4), (3, 5), (5, 2)]));
        let u = DetectionBorder::UNBOUNDED;
        assert_eq!(border.as_slice(), &[u, u, 10, 6, 3, 3]);
    }

    #[test]
    fn test_empty_spectrum_has_two_unbounded_entries() {
        let border = DetectionBorder::from_spectrum(&PatternSpectrum::new());
        assert_eq!(border.as_slice(), &[u64::MAX, u64::MAX]);
        assert_eq!(border.threshold(7), 0);
    }

    #[test]
    fn test_admits_beyond_border_length() {
        let border = DetectionBorder::from_spectrum(&spectrum(&[(2, 3)]));
        assert!(!border.admits(1, 1000));
        assert!(!border.admits(2, 3));
        assert!(border.admits(2, 4));
        assert!(border.admits(9, 1));
    }
}
