use std::collections::BTreeSet;

use assembly_analysis::mining::{Eclat, MiningParams, Pattern, Signature};
use assembly_analysis::reduction::reduce;
use assembly_analysis::spectrum::{filter_patterns, for_method, DetectionBorder, NullModelEstimator, PatternSpectrum};
use assembly_analysis::TransactionDb;
use assembly_core::{MiningTarget, PreferenceRule, SurrogateMethod};
use proptest::prelude::*;

fn db_strategy() -> impl Strategy<Value = TransactionDb<u32>> {
    prop::collection::vec(prop::collection::btree_set(0u32..7, 0..5), 0..14).prop_map(|rows| TransactionDb::new(rows))
}

fn spectrum_strategy() -> impl Strategy<Value = PatternSpectrum> {
    prop::collection::vec((1usize..6, 1u64..10, 0u32..20), 0..12).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(size, support, count)| (Signature::new(size, support), f64::from(count)))
            .collect()
    })
}

fn mine(db: &TransactionDb<u32>, target: MiningTarget, min_support: u64) -> Vec<Pattern<u32>> {
    Eclat::new(MiningParams::new(target).with_min_support(min_support))
        .unwrap()
        .mine(db)
        .unwrap()
}

fn support(db: &TransactionDb<u32>, items: &[u32]) -> u64 {
    db.iter()
        .filter(|t| items.iter().all(|i| t.contains(i)))
        .count() as u64
}

fn keyed(patterns: &[Pattern<u32>]) -> BTreeSet<(Vec<u32>, u64)> {
    patterns.iter().map(|p| (p.items.clone(), p.support)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reported_support_is_exact_and_frequent(db in db_strategy(), min_support in 1u64..4) {
        for target in MiningTarget::ALL {
            for p in mine(&db, target, min_support) {
                prop_assert!(p.support >= min_support);
                prop_assert_eq!(p.support, support(&db, &p.items), "pattern {:?}", p.items);
            }
        }
    }

    #[test]
    fn all_contains_closed_contains_maximal(db in db_strategy(), min_support in 1u64..4) {
        let all = keyed(&mine(&db, MiningTarget::All, min_support));
        let closed = keyed(&mine(&db, MiningTarget::Closed, min_support));
        let maximal = keyed(&mine(&db, MiningTarget::Maximal, min_support));
        prop_assert!(closed.is_subset(&all));
        prop_assert!(maximal.is_subset(&closed));
    }

    #[test]
    fn count_matches_materialized_output(db in db_strategy(), min_support in 1u64..4) {
        for target in MiningTarget::ALL {
            let eclat = Eclat::new(MiningParams::new(target).with_min_support(min_support).with_sizes(2, 3)).unwrap();
            prop_assert_eq!(eclat.count(&db).unwrap(), eclat.mine(&db).unwrap().len() as u64);
        }
    }

    #[test]
    fn border_is_non_increasing(spectrum in spectrum_strategy()) {
        let border = DetectionBorder::from_spectrum(&spectrum);
        prop_assert!(border.len() >= 2);
        prop_assert_eq!(border.threshold(0), DetectionBorder::UNBOUNDED);
        prop_assert_eq!(border.threshold(1), DetectionBorder::UNBOUNDED);
        prop_assert!(border.as_slice()[2..].windows(2).all(|w| w[0] >= w[1]));
        for (sig, _) in spectrum.iter() {
            if sig.size >= 2 {
                prop_assert!(border.threshold(sig.size) > sig.support);
            }
        }
    }

    #[test]
    fn filter_keeps_exactly_admitted_patterns(db in db_strategy(), spectrum in spectrum_strategy()) {
        let border = DetectionBorder::from_spectrum(&spectrum);
        let patterns = mine(&db, MiningTarget::Closed, 1);
        let kept = filter_patterns(patterns.clone(), &border);
        let expected: Vec<_> = patterns
            .into_iter()
            .filter(|p| p.size() >= border.len() || p.support >= border.threshold(p.size()))
            .collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn reduction_without_synthesis_is_idempotent(db in db_strategy(), spectrum in spectrum_strategy()) {
        let border = DetectionBorder::from_spectrum(&spectrum);
        let patterns = mine(&db, MiningTarget::Closed, 1);
        for rule in PreferenceRule::ALL {
            let once = reduce(patterns.clone(), rule, &border, false);
            let twice = reduce(once.clone(), rule, &border, false);
            prop_assert_eq!(&once, &twice, "rule {}", rule);
            prop_assert!(once.iter().all(|p| patterns.contains(p)));
        }
    }

    #[test]
    fn spectrum_merge_is_associative(a in spectrum_strategy(), b in spectrum_strategy(), c in spectrum_strategy()) {
        let mut left = a.clone();
        left.merge(&b);
        left.merge(&c);

        let mut bc = b.clone();
        bc.merge(&c);
        let mut right = a;
        right.merge(&bc);

        prop_assert_eq!(left, right);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn estimate_does_not_depend_on_worker_count(db in db_strategy(), seed in any::<u64>(), workers in 2usize..6) {
        let eclat = Eclat::new(MiningParams::new(MiningTarget::All).with_min_support(1).with_sizes(1, 4)).unwrap();
        let run = |w| {
            NullModelEstimator::new(for_method(SurrogateMethod::Swap), eclat)
                .with_trials(6)
                .with_seed(seed)
                .with_workers(w)
                .estimate(&db, None)
                .unwrap()
                .spectrum
        };
        prop_assert_eq!(run(1), run(workers));
    }
}
