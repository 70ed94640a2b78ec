//! Pattern reporting: size filtering, perfect-extension expansion and sinks.

use assembly_core::types::collections::{FxHashMap, SmallVec8};
use assembly_core::MiningTarget;

use super::types::{Pattern, Signature, SizeBounds};
use crate::data::Item;

/// Receives the patterns found by the miner.
///
/// `accept` gets every pattern that passed the size filter. Sinks that only
/// care about sizes may override `accept_expansions` to count a power set
/// without enumerating it.
pub trait PatternSink<I: Item> {
    fn accept(&mut self, items: &[I], support: u64);

    /// Report `base` combined with every subset of `extensions`.
    fn accept_expansions(&mut self, base: &[I], extensions: &[I], support: u64, sizes: SizeBounds) {
        let mut current: SmallVec8<I> = base.iter().cloned().collect();
        expand(&mut current, extensions, support, sizes, self);
    }
}

/// Binary recursion: first include `extensions[0]`, then leave it out.
fn expand<I: Item, S: PatternSink<I> + ?Sized>(
    current: &mut SmallVec8<I>,
    extensions: &[I],
    support: u64,
    sizes: SizeBounds,
    sink: &mut S,
) {
    if current.len() > sizes.max || current.len() + extensions.len() < sizes.min {
        return;
    }
    match extensions.split_first() {
        None => sink.accept(current.as_slice(), support),
        Some((head, rest)) => {
            current.push(head.clone());
            expand(current, rest, support, sizes, sink);
            current.pop();
            expand(current, rest, support, sizes, sink);
        }
    }
}

/// Routes the miner's reporting decisions to a sink.
pub(crate) struct Reporter<'a, S: ?Sized> {
    target: MiningTarget,
    sizes: SizeBounds,
    sink: &'a mut S,
}

impl<'a, S: ?Sized> Reporter<'a, S> {
    pub(crate) fn new(target: MiningTarget, sizes: SizeBounds, sink: &'a mut S) -> Self {
        Self { target, sizes, sink }
    }

    /// Report `base` with its perfect extensions: the full set for closed
    /// and maximal targets, every subset for the all target.
    pub(crate) fn report<I: Item>(&mut self, base: &[I], extensions: &[I], support: u64)
    where
        S: PatternSink<I>,
    {
        match self.target {
            MiningTarget::All => {
                self.sink
                    .accept_expansions(base, extensions, support, self.sizes)
            }
            MiningTarget::Closed | MiningTarget::Maximal => {
                if !self.sizes.contains(base.len() + extensions.len()) {
                    return;
                }
                let items: SmallVec8<I> = base.iter().chain(extensions).cloned().collect();
                self.sink.accept(&items, support);
            }
        }
    }
}

/// Collects every reported pattern.
#[derive(Debug)]
pub struct PatternCollector<I: Item> {
    patterns: Vec<Pattern<I>>,
}

impl<I: Item> PatternCollector<I> {
    pub fn new() -> Self {
        Self { patterns: Vec::new() }
    }

    pub fn into_patterns(self) -> Vec<Pattern<I>> {
        self.patterns
    }
}

impl<I: Item> Default for PatternCollector<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Item> PatternSink<I> for PatternCollector<I> {
    fn accept(&mut self, items: &[I], support: u64) {
        self.patterns.push(Pattern::new(items.to_vec(), support));
    }
}

/// Counts reported patterns.
#[derive(Debug, Default)]
pub struct PatternCounter {
    count: u64,
}

impl PatternCounter {
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl<I: Item> PatternSink<I> for PatternCounter {
    fn accept(&mut self, _items: &[I], _support: u64) {
        self.count += 1;
    }

    fn accept_expansions(&mut self, base: &[I], extensions: &[I], _support: u64, sizes: SizeBounds) {
        for_each_expansion_size(base.len(), extensions.len(), sizes, |_, n| {
            self.count = self.count.saturating_add(n);
        });
    }
}

/// Counts reported patterns per (size, support) signature.
#[derive(Debug, Default)]
pub struct SignatureCounter {
    counts: FxHashMap<Signature, u64>,
}

impl SignatureCounter {
    pub fn counts(&self) -> &FxHashMap<Signature, u64> {
        &self.counts
    }

    pub fn into_counts(self) -> FxHashMap<Signature, u64> {
        self.counts
    }

    fn add(&mut self, signature: Signature, n: u64) {
        let slot = self.counts.entry(signature).or_insert(0);
        *slot = slot.saturating_add(n);
    }
}

impl<I: Item> PatternSink<I> for SignatureCounter {
    fn accept(&mut self, items: &[I], support: u64) {
        self.add(Signature::new(items.len(), support), 1);
    }

    fn accept_expansions(&mut self, base: &[I], extensions: &[I], support: u64, sizes: SizeBounds) {
        for_each_expansion_size(base.len(), extensions.len(), sizes, |size, n| {
            self.add(Signature::new(size, support), n);
        });
    }
}

/// Calls `f(size, C(n, k))` for each size `base + k` inside `sizes`.
fn for_each_expansion_size(base: usize, n: usize, sizes: SizeBounds, mut f: impl FnMut(usize, u64)) {
    let mut binom: u128 = 1;
    for k in 0..=n {
        if k > 0 {
            binom = binom.saturating_mul((n - k + 1) as u128) / k as u128;
        }
        let size = base + k;
        if size > sizes.max {
            break;
        }
        if size >= sizes.min {
            f(size, u64::try_from(binom).unwrap_or(u64::MAX));
        }
    }
}
