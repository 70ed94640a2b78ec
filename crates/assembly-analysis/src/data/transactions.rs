//! Transaction databases.

use std::fmt::Debug;
use std::hash::Hash;

use assembly_core::types::collections::FxHashMap;

/// An opaque, totally ordered, hashable item identifier.
///
/// `Send + Sync` so databases can be shared with surrogate workers.
pub trait Item: Clone + Ord + Hash + Debug + Send + Sync {}

impl<T: Clone + Ord + Hash + Debug + Send + Sync> Item for T {}

/// A finite sequence of transactions, each a set of items.
///
/// Each transaction is stored sorted and without duplicate items, so that
/// identical sets compare equal regardless of input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDb<I: Item> {
    transactions: Vec<Vec<I>>,
}

impl<I: Item> TransactionDb<I> {
    /// Build a database from any iterable of item iterables.
    pub fn new<T, It>(transactions: T) -> Self
    where
        T: IntoIterator<Item = It>,
        It: IntoIterator<Item = I>,
    {
        transactions.into_iter().collect()
    }

    /// Build a database from transactions that keep their column order.
    ///
    /// Used for table-derived data, where the position of an item in a
    /// record is meaningful (the shuffle surrogate permutes by column).
    pub fn from_rows(rows: Vec<Vec<I>>) -> Self {
        Self { transactions: rows }
    }

    /// Number of transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn transactions(&self) -> &[Vec<I>] {
        &self.transactions
    }

    pub fn iter(&self) -> impl Iterator<Item = &[I]> {
        self.transactions.iter().map(Vec::as_slice)
    }

    /// Total number of item occurrences over all transactions.
    pub fn occurrences(&self) -> usize {
        self.transactions.iter().map(Vec::len).sum()
    }

    /// Occurrence count per distinct item, sorted by item.
    pub fn item_frequencies(&self) -> Vec<(I, usize)> {
        let mut counts: FxHashMap<&I, usize> = FxHashMap::default();
        for item in self.transactions.iter().flatten() {
            *counts.entry(item).or_insert(0) += 1;
        }
        let mut frequencies: Vec<(I, usize)> =
            counts.into_iter().map(|(item, n)| (item.clone(), n)).collect();
        frequencies.sort_by(|a, b| a.0.cmp(&b.0));
        frequencies
    }

    pub fn into_inner(self) -> Vec<Vec<I>> {
        self.transactions
    }
}

impl<I: Item, It: IntoIterator<Item = I>> FromIterator<It> for TransactionDb<I> {
    fn from_iter<T: IntoIterator<Item = It>>(iter: T) -> Self {
        let transactions = iter
            .into_iter()
            .map(|t| {
                let mut items: Vec<I> = t.into_iter().collect();
                items.sort();
                items.dedup();
                items
            })
            .collect();
        Self { transactions }
    }
}
