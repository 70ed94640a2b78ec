//! Pattern set reduction.
//!
//! Patterns are sorted by (size, items, support) once; the sorted list is
//! read-only for the rest of the pass and only the kept flags change.

use std::cmp::Ordering;
use std::time::Instant;

use assembly_core::PreferenceRule;

use super::preference::{prefer, Preference};
use crate::data::Item;
use crate::mining::Pattern;
use crate::spectrum::DetectionBorder;

/// Remove patterns dominated by an overlapping pattern under `rule`.
///
/// Every pair (A, B) with B earlier in sorted order is examined unless both
/// are already discarded. When B is a subset of A the rule decides between
/// them. When the two only overlap and `synthesize` is set, their
/// intersection P acts as a virtual pattern with support `max(cA, cB)`,
/// provided that support clears the border at `|P|`; every cataloged
/// proper superset of P that loses against it is discarded.
///
/// Returns the kept patterns in sorted order. The `None` rule returns the
/// input unchanged.
pub fn reduce<I: Item>(
    patterns: Vec<Pattern<I>>,
    rule: PreferenceRule,
    border: &DetectionBorder,
    synthesize: bool,
) -> Vec<Pattern<I>> {
    if rule == PreferenceRule::None {
        return patterns;
    }
    let start = Instant::now();
    let mut patterns = patterns;
    patterns.sort_by(canonical_order);
    let mut kept = vec![true; patterns.len()];

    for a in 0..patterns.len() {
        let pa = &patterns[a];
        for b in 0..a {
            if !kept[a] && !kept[b] {
                continue;
            }
            let pb = &patterns[b];
            let overlap = intersection_len(&pa.items, &pb.items);
            if overlap == 0 {
                continue;
            }
            if overlap >= pb.size() {
                match prefer(rule, pa.size(), pa.support, pb.size(), pb.support, border) {
                    Preference::Superset => kept[b] = false,
                    Preference::Subset => kept[a] = false,
                    Preference::Neither => {}
                }
                continue;
            }

            let support = pa.support.max(pb.support);
            if !synthesize || support < border.threshold(overlap) {
                continue;
            }
            let shared = intersection(&pa.items, &pb.items);
            filter_with_intersection(&patterns, &mut kept, &shared, support, rule, border);
        }
    }

    let before = patterns.len();
    let reduced: Vec<Pattern<I>> = patterns
        .into_iter()
        .zip(kept)
        .filter_map(|(p, keep)| keep.then_some(p))
        .collect();
    tracing::debug!(
        rule = %rule,
        before,
        after = reduced.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "pattern set reduced"
    );
    reduced
}

/// Discard cataloged proper supersets of `shared` that lose against it.
fn filter_with_intersection<I: Item>(
    patterns: &[Pattern<I>],
    kept: &mut [bool],
    shared: &[I],
    support: u64,
    rule: PreferenceRule,
    border: &DetectionBorder,
) {
    let size = shared.len();
    let from = patterns.partition_point(|q| {
        (q.size(), q.items.as_slice(), q.support) < (size, shared, support)
    });
    for (q, pattern) in patterns.iter().enumerate().skip(from) {
        if pattern.size() <= size {
            if pattern.items == shared {
                break;
            }
            continue;
        }
        if is_subset(shared, &pattern.items)
            && prefer(rule, pattern.size(), pattern.support, size, support, border)
                == Preference::Subset
        {
            kept[q] = false;
        }
    }
}

fn canonical_order<I: Item>(a: &Pattern<I>, b: &Pattern<I>) -> Ordering {
    a.size()
        .cmp(&b.size())
        .then_with(|| a.items.cmp(&b.items))
        .then_with(|| a.support.cmp(&b.support))
}

fn intersection_len<I: Item>(a: &[I], b: &[I]) -> usize {
    let mut n = 0;
    merge_shared(a, b, |_| n += 1);
    n
}

fn intersection<I: Item>(a: &[I], b: &[I]) -> Vec<I> {
    let mut shared = Vec::new();
    merge_shared(a, b, |item| shared.push(item.clone()));
    shared
}

fn merge_shared<'a, I: Item>(a: &'a [I], b: &[I], mut on_shared: impl FnMut(&'a I)) {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                on_shared(&a[i]);
                i += 1;
                j += 1;
            }
        }
    }
}

/// Whether sorted `small` is contained in sorted `large`.
fn is_subset<I: Item>(small: &[I], large: &[I]) -> bool {
    small.len() <= large.len() && intersection_len(small, large) == small.len()
}
