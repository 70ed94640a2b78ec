//! Vertical transaction index: deduplicated, weighted posting lists.
//!
//! Identical transactions collapse into one row carrying a weight. Each item
//! maps to the sorted ids of the rows that contain it. Items present in every
//! row are global perfect extensions and never enter the search.

use std::cmp::Ordering;

use assembly_core::errors::MiningError;
use assembly_core::types::collections::FxHashMap;
use assembly_core::SupportThreshold;

use crate::data::{Item, TransactionDb};

/// Sorted ids of the (deduplicated) transactions containing a pattern,
/// plus their summed weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingList {
    tids: Vec<u32>,
    support: u64,
}

impl PostingList {
    pub fn new(tids: Vec<u32>, support: u64) -> Self {
        Self { tids, support }
    }

    pub fn support(&self) -> u64 {
        self.support
    }

    pub fn tids(&self) -> &[u32] {
        &self.tids
    }

    pub fn len(&self) -> usize {
        self.tids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tids.is_empty()
    }

    /// Intersect with `other`, summing the weights of the shared rows.
    pub fn intersect(&self, other: &PostingList, weights: &[u64]) -> PostingList {
        let mut tids = Vec::with_capacity(self.tids.len().min(other.tids.len()));
        let mut support = 0;
        merge_common(&self.tids, &other.tids, |tid| {
            tids.push(tid);
            support += weights[tid as usize];
        });
        PostingList { tids, support }
    }

    /// Weight of the intersection with `other`, without materializing it.
    pub fn intersection_support(&self, other: &PostingList, weights: &[u64]) -> u64 {
        let mut support = 0;
        merge_common(&self.tids, &other.tids, |tid| support += weights[tid as usize]);
        support
    }

    /// Whether every row of this list also occurs in `other`.
    pub fn is_subset_of(&self, other: &PostingList) -> bool {
        if self.tids.len() > other.tids.len() {
            return false;
        }
        let mut rest = other.tids.iter();
        self.tids
            .iter()
            .all(|tid| rest.by_ref().find(|o| *o >= tid) == Some(tid))
    }
}

fn merge_common(a: &[u32], b: &[u32], mut on_match: impl FnMut(u32)) {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                on_match(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
}

/// A search candidate: an item with its posting list at the current prefix.
#[derive(Debug, Clone)]
pub struct Candidate<I: Item> {
    pub item: I,
    pub postings: PostingList,
}

impl<I: Item> Candidate<I> {
    pub fn support(&self) -> u64 {
        self.postings.support
    }

    /// Search order: ascending support, ties broken by item.
    pub fn search_order(a: &Self, b: &Self) -> Ordering {
        a.support()
            .cmp(&b.support())
            .then_with(|| a.item.cmp(&b.item))
    }
}

/// Vertical representation of a transaction database.
#[derive(Debug, Clone)]
pub struct VerticalIndex<I: Item> {
    weights: Vec<u64>,
    total_weight: u64,
    min_support: u64,
    perfect_extensions: Vec<I>,
    candidates: Vec<Candidate<I>>,
}

impl<I: Item> VerticalIndex<I> {
    /// Build the index, resolving `min_support` against the transaction count.
    ///
    /// A database with fewer transactions than the resolved minimum support
    /// yields an empty index: no candidates and no perfect extensions.
    pub fn build(db: &TransactionDb<I>, min_support: SupportThreshold) -> Result<Self, MiningError> {
        let min_support = min_support.resolve(db.len());
        let total_weight = db.len() as u64;
        if total_weight < min_support {
            return Ok(Self::empty(min_support, total_weight));
        }

        // Deduplicate rows in first-seen order.
        let mut row_ids: FxHashMap<Vec<I>, u32> = FxHashMap::default();
        let mut rows: Vec<Vec<I>> = Vec::new();
        let mut weights: Vec<u64> = Vec::new();
        for transaction in db.iter() {
            let mut key = transaction.to_vec();
            key.sort();
            key.dedup();
            if let Some(&tid) = row_ids.get(&key) {
                weights[tid as usize] += 1;
                continue;
            }
            let tid = u32::try_from(rows.len()).map_err(|_| MiningError::TooManyTransactions {
                count: rows.len() + 1,
                max: u32::MAX as usize,
            })?;
            row_ids.insert(key.clone(), tid);
            rows.push(key);
            weights.push(1);
        }

        let mut postings: FxHashMap<I, PostingList> = FxHashMap::default();
        for (tid, row) in rows.into_iter().enumerate() {
            let weight = weights[tid];
            for item in row {
                let list = postings
                    .entry(item)
                    .or_insert_with(|| PostingList::new(Vec::new(), 0));
                list.tids.push(tid as u32);
                list.support += weight;
            }
        }

        let mut perfect_extensions = Vec::new();
        let mut candidates = Vec::new();
        for (item, list) in postings {
            if list.support >= total_weight {
                perfect_extensions.push(item);
            } else if list.support >= min_support {
                candidates.push(Candidate { item, postings: list });
            }
        }
        perfect_extensions.sort();
        candidates.sort_by(Candidate::search_order);

        tracing::trace!(
            distinct_transactions = weights.len(),
            candidates = candidates.len(),
            perfect_extensions = perfect_extensions.len(),
            "vertical index built"
        );

        Ok(Self {
            weights,
            total_weight,
            min_support,
            perfect_extensions,
            candidates,
        })
    }

    fn empty(min_support: u64, total_weight: u64) -> Self {
        Self {
            weights: Vec::new(),
            total_weight,
            min_support,
            perfect_extensions: Vec::new(),
            candidates: Vec::new(),
        }
    }

    /// Weight per deduplicated transaction, indexed by transaction id.
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    pub fn distinct_transactions(&self) -> usize {
        self.weights.len()
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// The resolved absolute minimum support.
    pub fn min_support(&self) -> u64 {
        self.min_support
    }

    /// True when the data has fewer transactions than the minimum support.
    pub fn is_infrequent(&self) -> bool {
        self.total_weight < self.min_support
    }

    /// Items contained in every transaction, sorted.
    pub fn perfect_extensions(&self) -> &[I] {
        &self.perfect_extensions
    }

    /// Frequent items that are not global perfect extensions.
    pub fn candidates(&self) -> &[Candidate<I>] {
        &self.candidates
    }

    pub(crate) fn into_parts(self) -> (Vec<u64>, Vec<I>, Vec<Candidate<I>>) {
        (self.weights, self.perfect_extensions, self.candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db(rows: &[&[u32]]) -> TransactionDb<u32> {
        TransactionDb::new(rows.iter().map(|r| r.to_vec()))
    }

    #[test]
    fn test_duplicate_rows_collapse_into_weights() {
        let index =
            VerticalIndex::build(&db(&[&[1, 2], &[2, 1], &[3]]), SupportThreshold::Absolute(1))
                .unwrap();
        assert_eq!(index.distinct_transactions(), 2);
        assert_eq!(index.weights(), &[2, 1]);
        assert_eq!(index.total_weight(), 3);

        let one = index.candidates().iter().find(|c| c.item == 1).unwrap();
        assert_eq!(one.support(), 2);
        assert_eq!(one.postings.tids(), &[0]);
    }

    #[test]
    fn test_items_in_every_row_are_perfect_extensions() {
        let index = VerticalIndex::build(
            &db(&[&[1, 2, 3], &[1, 2, 3], &[1, 2, 3, 4]]),
            SupportThreshold::Absolute(1),
        )
        .unwrap();
        assert_eq!(index.perfect_extensions(), &[1, 2, 3]);
        assert_eq!(index.candidates().len(), 1);
        assert_eq!(index.candidates()[0].item, 4);
    }

    #[test]
    fn test_infrequent_items_dropped_and_candidates_sorted() {
        let index = VerticalIndex::build(
            &db(&[&[1, 2, 3], &[1, 2], &[1, 4], &[5]]),
            SupportThreshold::Absolute(2),
        )
        .unwrap();
        let order: Vec<(u32, u64)> = index
            .candidates()
            .iter()
            .map(|c| (c.item, c.support()))
            .collect();
        assert_eq!(order, vec![(2, 2), (1, 3)]);
    }

    #[test]
    fn test_too_few_transactions_yields_empty_index() {
        let index =
            VerticalIndex::build(&db(&[&[1, 2], &[1, 2]]), SupportThreshold::Absolute(3)).unwrap();
        assert!(index.is_infrequent());
        assert!(index.perfect_extensions().is_empty());
        assert!(index.candidates().is_empty());
    }

    #[test]
    fn test_posting_list_set_operations() {
        let weights = [1, 2, 3, 4, 5];
        let a = PostingList::new(vec![0, 2, 4], 9);
        let b = PostingList::new(vec![1, 2, 3, 4], 14);
        let both = a.intersect(&b, &weights);
        assert_eq!(both.tids(), &[2, 4]);
        assert_eq!(both.support(), 8);
        assert_eq!(a.intersection_support(&b, &weights), 8);
        assert!(both.is_subset_of(&a));
        assert!(both.is_subset_of(&b));
        assert!(!a.is_subset_of(&b));
        assert!(PostingList::new(vec![], 0).is_subset_of(&a));
    }
}
