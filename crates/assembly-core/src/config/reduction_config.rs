//! Pattern set reduction configuration.

use serde::{Deserialize, Serialize};

use crate::types::modes::PreferenceRule;

/// Configuration for pattern set reduction.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReductionConfig {
    /// Preference rule. Default: lenient1.
    pub rule: Option<PreferenceRule>,
    /// Add virtual intersection patterns of overlapping patterns. Default: false.
    pub synthesize_intersections: Option<bool>,
}

impl ReductionConfig {
    pub fn effective_rule(&self) -> PreferenceRule {
        self.rule.unwrap_or(PreferenceRule::Lenient1)
    }

    pub fn effective_synthesize(&self) -> bool {
        self.synthesize_intersections.unwrap_or(false)
    }
}
