//! Pairwise preference rules between a pattern A and a subset pattern B.

use assembly_core::PreferenceRule;

use crate::spectrum::DetectionBorder;

/// Outcome of comparing a superset pattern A with a subset pattern B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preference {
    /// Keep A, discard B.
    Superset,
    /// Keep B, discard A.
    Subset,
    /// Keep both.
    Neither,
}

impl Preference {
    /// Sign convention: +1 superset, -1 subset, 0 neither.
    pub fn signum(self) -> i8 {
        match self {
            Self::Superset => 1,
            Self::Subset => -1,
            Self::Neither => 0,
        }
    }

    fn from_test(superset_wins: bool) -> Self {
        if superset_wins {
            Self::Superset
        } else {
            Self::Subset
        }
    }
}

/// Compare pattern A (`size_a` items, support `supp_a`) with pattern B,
/// whose items are a subset of A's.
///
/// Every rule except `None` prefers the superset when its support is at
/// least that of the subset.
pub fn prefer(
    rule: PreferenceRule,
    size_a: usize,
    supp_a: u64,
    size_b: usize,
    supp_b: u64,
    border: &DetectionBorder,
) -> Preference {
    if rule == PreferenceRule::None {
        return Preference::Neither;
    }
    if supp_a >= supp_b {
        return Preference::Superset;
    }

    // supp_b > supp_a from here on.
    let excess = supp_b - supp_a;
    let excess_items = || supp_a < border.threshold(size_a.saturating_sub(size_b) + 2);
    let excess_coins = || excess.saturating_add(1) < border.threshold(size_b);
    let cover0 = || covered(size_a, supp_a, 0) >= covered(size_b, supp_b, 0);
    let cover1 = || covered(size_a, supp_a, 1) >= covered(size_b, supp_b, 1);

    match rule {
        PreferenceRule::None => Preference::Neither,
        PreferenceRule::Coins0 => Preference::from_test(excess < border.threshold(size_b)),
        PreferenceRule::Coins1 => Preference::from_test(excess_coins()),
        PreferenceRule::Items2 => Preference::from_test(!excess_items()),
        PreferenceRule::Cover0 => Preference::from_test(cover0()),
        PreferenceRule::Cover1 => Preference::from_test(cover1()),
        PreferenceRule::Lenient0 | PreferenceRule::Lenient1 => {
            match (excess_items(), excess_coins()) {
                (true, false) => Preference::Subset,
                (false, true) => Preference::Superset,
                (false, false) => Preference::Neither,
                (true, true) if rule == PreferenceRule::Lenient0 => Preference::from_test(cover0()),
                (true, true) => Preference::from_test(cover1()),
            }
        }
        PreferenceRule::Strict0 | PreferenceRule::Strict1 => {
            match (excess_items(), excess_coins()) {
                (true, false) => Preference::Subset,
                (false, true) => Preference::Superset,
                _ if rule == PreferenceRule::Strict0 => Preference::from_test(cover0()),
                _ => Preference::from_test(cover1()),
            }
        }
    }
}

/// Number of covered points: `(size - offset) * support`.
fn covered(size: usize, support: u64, offset: usize) -> u128 {
    size.saturating_sub(offset) as u128 * support as u128
}
