//! Eclat: depth-first frequent item set search over a vertical index.
//!
//! Candidates at each node are processed in ascending (support, item) order.
//! Every recursion level owns a freshly projected candidate list; parents
//! hand down only shared references to their processed posting lists
//! (the elimination list used by the closed and maximal tests).

use std::time::Instant;

use assembly_core::errors::MiningError;
use assembly_core::types::collections::{FxHashMap, SmallVec8};
use assembly_core::MiningTarget;

use super::index::{Candidate, PostingList, VerticalIndex};
use super::report::{PatternCollector, PatternCounter, PatternSink, Reporter, SignatureCounter};
use super::types::{MiningParams, Pattern, Signature};
use crate::data::{Item, TransactionDb};

/// Frequent item set miner.
///
/// Holds only validated parameters, so one instance can be shared across
/// threads and reused for any number of databases.
#[derive(Debug, Clone, Copy)]
pub struct Eclat {
    params: MiningParams,
}

impl Eclat {
    pub fn new(params: MiningParams) -> Result<Self, MiningError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &MiningParams {
        &self.params
    }

    /// Mine `db` and return every reported pattern.
    pub fn mine<I: Item>(&self, db: &TransactionDb<I>) -> Result<Vec<Pattern<I>>, MiningError> {
        let mut sink = PatternCollector::new();
        self.run(db, &mut sink)?;
        Ok(sink.into_patterns())
    }

    /// Number of patterns `mine` would return.
    pub fn count<I: Item>(&self, db: &TransactionDb<I>) -> Result<u64, MiningError> {
        let mut sink = PatternCounter::default();
        self.run(db, &mut sink)?;
        Ok(sink.count())
    }

    /// Number of reported patterns per (size, support) signature.
    pub fn mine_signatures<I: Item>(
        &self,
        db: &TransactionDb<I>,
    ) -> Result<FxHashMap<Signature, u64>, MiningError> {
        let mut sink = SignatureCounter::default();
        self.run(db, &mut sink)?;
        Ok(sink.into_counts())
    }

    /// Mine `db`, handing every reported pattern to `sink`.
    pub fn run<I, S>(&self, db: &TransactionDb<I>, sink: &mut S) -> Result<(), MiningError>
    where
        I: Item,
        S: PatternSink<I> + ?Sized,
    {
        let start = Instant::now();
        let index = VerticalIndex::build(db, self.params.min_support)?;
        if index.is_infrequent() {
            tracing::debug!(
                transactions = db.len(),
                min_support = index.min_support(),
                "fewer transactions than minimum support, nothing to mine"
            );
            return Ok(());
        }

        let target = self.params.target;
        let sizes = self.params.sizes;
        let min_support = index.min_support();
        let total = index.total_weight();
        let distinct = index.distinct_transactions();
        let (weights, perfect_extensions, candidates) = index.into_parts();

        // Perfect extensions are free for closed/maximal sets, so allow one
        // more level to detect supersets of maximum-size patterns.
        let depth_limit = if target.needs_elimination_check() && sizes.is_bounded() {
            sizes.max + 1
        } else {
            sizes.max
        };

        let mut search = Search {
            weights: &weights,
            target,
            min_support,
            depth_limit,
            reporter: Reporter::new(target, sizes, sink),
        };
        let top_max = search.recurse(candidates, &[], &perfect_extensions, &[]);

        if perfect_extensions.len() >= sizes.min {
            let report = match target {
                MiningTarget::All => true,
                MiningTarget::Closed => top_max < total,
                MiningTarget::Maximal => top_max < min_support,
            };
            if report {
                search.reporter.report::<I>(&[], &perfect_extensions, total);
            }
        }

        tracing::debug!(
            mining_target = %target,
            distinct_transactions = distinct,
            min_support,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "mining complete"
        );
        Ok(())
    }
}

struct Search<'a, S: ?Sized> {
    weights: &'a [u64],
    target: MiningTarget,
    min_support: u64,
    depth_limit: usize,
    reporter: Reporter<'a, S>,
}

impl<S: ?Sized> Search<'_, S> {
    /// Process one search node; returns the maximum candidate support.
    fn recurse<I: Item>(
        &mut self,
        mut candidates: Vec<Candidate<I>>,
        prefix: &[I],
        extensions: &[I],
        eliminated: &[&PostingList],
    ) -> u64
    where
        S: PatternSink<I>,
    {
        candidates.sort_by(Candidate::search_order);
        let checks = self.target.needs_elimination_check();
        let mut processed: Vec<&PostingList> = Vec::with_capacity(candidates.len());
        let mut max_support = 0;

        for (k, candidate) in candidates.iter().enumerate() {
            let support = candidate.support();
            max_support = max_support.max(support);
            if checks && is_dominated(&candidate.postings, eliminated, &processed) {
                continue;
            }

            let mut projection = Vec::new();
            let mut node_extensions: SmallVec8<I> = extensions.iter().cloned().collect();
            for later in &candidates[k + 1..] {
                let postings = later.postings.intersect(&candidate.postings, self.weights);
                if postings.support() >= support {
                    node_extensions.push(later.item.clone());
                } else if postings.support() >= self.min_support {
                    projection.push(Candidate {
                        item: later.item.clone(),
                        postings,
                    });
                }
            }

            let mut node: SmallVec8<I> = prefix.iter().cloned().collect();
            node.push(candidate.item.clone());
            let free = if checks { node_extensions.len() } else { 0 };
            let subtree_max = if !projection.is_empty() && node.len() + free < self.depth_limit {
                let inherited: Vec<&PostingList> =
                    eliminated.iter().chain(processed.iter()).copied().collect();
                self.recurse(projection, &node, &node_extensions, &inherited)
            } else {
                0
            };

            let report = match self.target {
                MiningTarget::All => true,
                MiningTarget::Closed => subtree_max < support,
                MiningTarget::Maximal => {
                    subtree_max < self.min_support
                        && !self.has_frequent_extension(&candidate.postings, eliminated, &processed)
                }
            };
            if report {
                self.reporter.report::<I>(&node, &node_extensions, support);
            }
            processed.push(&candidate.postings);
        }
        max_support
    }

    fn has_frequent_extension(
        &self,
        postings: &PostingList,
        eliminated: &[&PostingList],
        processed: &[&PostingList],
    ) -> bool {
        processed
            .iter()
            .rev()
            .chain(eliminated.iter().rev())
            .any(|other| postings.intersection_support(other, self.weights) >= self.min_support)
    }
}

/// Whether an already processed item occurs in every row of `postings`.
fn is_dominated(
    postings: &PostingList,
    eliminated: &[&PostingList],
    processed: &[&PostingList],
) -> bool {
    processed
        .iter()
        .rev()
        .chain(eliminated.iter().rev())
        .any(|other| postings.is_subset_of(other))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assembly_core::SupportThreshold;

    fn two_assemblies() -> TransactionDb<u32> {
        TransactionDb::new(vec![vec![1, 2, 3, 4, 5, 6, 7], vec![1, 2, 3, 8]])
    }

    fn sorted(mut patterns: Vec<Pattern<u32>>) -> Vec<(Vec<u32>, u64)> {
        patterns.sort_by(|a, b| a.items.cmp(&b.items));
        patterns.into_iter().map(|p| (p.items, p.support)).collect()
    }

    fn miner(target: MiningTarget, min_support: u64) -> Eclat {
        Eclat::new(
            MiningParams::new(target)
                .with_min_support(min_support)
                .with_sizes(1, 8),
        )
        .unwrap()
    }

    #[test]
    fn test_closed_attaches_perfect_extensions() {
        let found = sorted(miner(MiningTarget::Closed, 1).mine(&two_assemblies()).unwrap());
        assert_eq!(
            found,
            vec![
                (vec![1, 2, 3], 2),
                (vec![1, 2, 3, 4, 5, 6, 7], 1),
                (vec![1, 2, 3, 8], 1),
            ]
        );
    }

    #[test]
    fn test_closed_min_support_two_keeps_shared_core() {
        let found = sorted(miner(MiningTarget::Closed, 2).mine(&two_assemblies()).unwrap());
        assert_eq!(found, vec![(vec![1, 2, 3], 2)]);
    }

    #[test]
    fn test_maximal_drops_subsets() {
        let found = sorted(miner(MiningTarget::Maximal, 1).mine(&two_assemblies()).unwrap());
        assert_eq!(
            found,
            vec![(vec![1, 2, 3, 4, 5, 6, 7], 1), (vec![1, 2, 3, 8], 1)]
        );
    }

    #[test]
    fn test_all_target_counts_every_frequent_set() {
        let db = TransactionDb::new(vec![vec![1u32, 2], vec![1, 2], vec![1, 3]]);
        let found = sorted(miner(MiningTarget::All, 2).mine(&db).unwrap());
        assert_eq!(found, vec![(vec![1], 3), (vec![1, 2], 2), (vec![2], 2)]);
        assert_eq!(miner(MiningTarget::All, 2).count(&db).unwrap(), 3);
    }

    #[test]
    fn test_every_item_everywhere_is_one_pattern() {
        let db = TransactionDb::new(vec![vec!["a", "b", "c"]; 4]);
        let eclat = Eclat::new(MiningParams::new(MiningTarget::Closed).with_min_support(1)).unwrap();
        let index = VerticalIndex::build(&db, SupportThreshold::Absolute(1)).unwrap();
        assert!(index.candidates().is_empty());
        assert_eq!(index.perfect_extensions(), &["a", "b", "c"]);

        let found = eclat.mine(&db).unwrap();
        assert_eq!(found, vec![Pattern::new(vec!["a", "b", "c"], 4)]);
    }

    #[test]
    fn test_max_size_limits_reports() {
        let db = TransactionDb::new(vec![vec![1u32, 2, 3], vec![1, 2, 3], vec![1, 2]]);
        let eclat = Eclat::new(
            MiningParams::new(MiningTarget::All)
                .with_min_support(2)
                .with_sizes(2, 2),
        )
        .unwrap();
        let found = sorted(eclat.mine(&db).unwrap());
        assert_eq!(found, vec![(vec![1, 2], 3), (vec![1, 3], 2), (vec![2, 3], 2)]);
    }

    #[test]
    fn test_signature_mode_matches_materialized_output() {
        let db = TransactionDb::new(vec![
            vec![1u32, 2, 3],
            vec![1, 2, 4],
            vec![1, 3, 4],
            vec![2, 3, 4],
            vec![1, 2, 3, 4],
        ]);
        let eclat = miner(MiningTarget::All, 2);
        let mut expected: FxHashMap<Signature, u64> = FxHashMap::default();
        for p in eclat.mine(&db).unwrap() {
            *expected.entry(p.signature()).or_insert(0) += 1;
        }
        assert_eq!(eclat.mine_signatures(&db).unwrap(), expected);
    }

    #[test]
    fn test_too_few_transactions_is_empty_not_error() {
        let db = TransactionDb::new(vec![vec![1u32, 2]]);
        assert!(miner(MiningTarget::Closed, 2).mine(&db).unwrap().is_empty());
        let empty: TransactionDb<u32> = TransactionDb::new(Vec::<Vec<u32>>::new());
        assert_eq!(miner(MiningTarget::All, 1).count(&empty).unwrap(), 0);
    }
}
