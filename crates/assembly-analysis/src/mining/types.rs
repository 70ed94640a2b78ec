//! Core types for the mining subsystem.

use std::fmt;

use assembly_core::errors::MiningError;
use assembly_core::{MiningTarget, SupportThreshold};
use serde::{Deserialize, Serialize};

use crate::data::Item;

/// The (size, support) pair of a pattern: the unit of statistical comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Signature {
    /// Number of items.
    pub size: usize,
    /// Number of (weighted) supporting transactions.
    pub support: u64,
}

impl Signature {
    pub fn new(size: usize, support: u64) -> Self {
        Self { size, support }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.size, self.support)
    }
}

/// An item set together with its support. Items are kept sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern<I: Item> {
    pub items: Vec<I>,
    pub support: u64,
}

impl<I: Item> Pattern<I> {
    pub fn new(mut items: Vec<I>, support: u64) -> Self {
        items.sort();
        items.dedup();
        Self { items, support }
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn signature(&self) -> Signature {
        Signature::new(self.items.len(), self.support)
    }

    /// Whether every item of `other` also occurs in this pattern.
    pub fn contains_all(&self, other: &[I]) -> bool {
        other.iter().all(|item| self.items.binary_search(item).is_ok())
    }
}

/// Inclusive bounds on the number of items of a reported pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBounds {
    pub min: usize,
    pub max: usize,
}

impl SizeBounds {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, size: usize) -> bool {
        size >= self.min && size <= self.max
    }

    pub fn is_bounded(&self) -> bool {
        self.max < usize::MAX
    }
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self::new(1, usize::MAX)
    }
}

/// Parameters of one mining run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningParams {
    pub target: MiningTarget,
    pub min_support: SupportThreshold,
    pub sizes: SizeBounds,
}

impl MiningParams {
    /// All sizes from 1 up, minimum support of 2 transactions.
    pub fn new(target: MiningTarget) -> Self {
        Self {
            target,
            min_support: SupportThreshold::default(),
            sizes: SizeBounds::default(),
        }
    }

    pub fn with_support(mut self, min_support: SupportThreshold) -> Self {
        self.min_support = min_support;
        self
    }

    /// Shorthand for an absolute minimum support.
    pub fn with_min_support(self, count: u64) -> Self {
        self.with_support(SupportThreshold::Absolute(count))
    }

    pub fn with_sizes(mut self, min: usize, max: usize) -> Self {
        self.sizes = SizeBounds::new(min, max);
        self
    }

    pub fn validate(&self) -> Result<(), MiningError> {
        if self.sizes.min == 0 || self.sizes.max < self.sizes.min {
            return Err(MiningError::InvalidSizeBounds {
                min: self.sizes.min,
                max: self.sizes.max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_normalizes_items() {
        let p = Pattern::new(vec![3, 1, 2, 3], 5);
        assert_eq!(p.items, vec![1, 2, 3]);
        assert_eq!(p.signature(), Signature::new(3, 5));
        assert!(p.contains_all(&[1, 3]));
        assert!(!p.contains_all(&[4]));
    }

    #[test]
    fn test_size_bounds_validation() {
        let ok = MiningParams::new(MiningTarget::All).with_sizes(2, 4);
        assert!(ok.validate().is_ok());

        let zero = MiningParams::new(MiningTarget::All).with_sizes(0, 4);
        assert!(matches!(zero.validate(), Err(MiningError::InvalidSizeBounds { .. })));

        let inverted = MiningParams::new(MiningTarget::Closed).with_sizes(5, 4);
        assert!(inverted.validate().is_err());
    }
}
