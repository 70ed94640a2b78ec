//! Pattern spectrum filtering.

use super::border::DetectionBorder;
use crate::data::Item;
use crate::mining::Pattern;

/// Keep the patterns whose support clears the border for their size.
///
/// Patterns larger than any size the border knows about are kept.
pub fn filter_patterns<I: Item>(patterns: Vec<Pattern<I>>, border: &DetectionBorder) -> Vec<Pattern<I>> {
    let before = patterns.len();
    let kept: Vec<Pattern<I>> = patterns
        .into_iter()
        .filter(|p| border.admits(p.size(), p.support))
        .collect();
    tracing::debug!(before, after = kept.len(), "spectrum filter applied");
    kept
}
