//! Mining configuration.

use serde::{Deserialize, Serialize};

use crate::types::modes::{MiningTarget, SupportThreshold};

/// Configuration for mining the original data.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MiningConfig {
    /// Target type for the original data. Default: closed.
    pub target: Option<MiningTarget>,
    /// Absolute minimum support. Default: 2.
    pub min_support: Option<u64>,
    /// Minimum support as a percentage of the transactions.
    /// Takes precedence over `min_support` when set.
    pub min_support_percent: Option<f64>,
    /// Minimum number of items per pattern. Default: 2.
    pub min_size: Option<usize>,
    /// Maximum number of items per pattern. Default: unbounded.
    pub max_size: Option<usize>,
}

impl MiningConfig {
    /// Returns the effective target, defaulting to closed item sets.
    pub fn effective_target(&self) -> MiningTarget {
        self.target.unwrap_or(MiningTarget::Closed)
    }

    /// Returns the effective support threshold, defaulting to 2 transactions.
    pub fn effective_support(&self) -> SupportThreshold {
        match self.min_support_percent {
            Some(pct) => SupportThreshold::Percent(pct),
            None => SupportThreshold::Absolute(self.min_support.unwrap_or(2)),
        }
    }

    /// Returns the effective minimum size, defaulting to 2 (pairs and up).
    pub fn effective_min_size(&self) -> usize {
        self.min_size.unwrap_or(2)
    }

    /// Returns the effective maximum size, `usize::MAX` when unbounded.
    pub fn effective_max_size(&self) -> usize {
        self.max_size.unwrap_or(usize::MAX)
    }
}
