//! Closed mode enumerations selecting engine behavior.
//!
//! Every axis the engine can be configured on (mining target, preference
//! rule, surrogate method, random density) is a closed enum dispatched by
//! `match`. Identifiers are decoded once, at the configuration boundary:
//! full names (snake_case) and the classic single-character codes are both
//! accepted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Which frequent item sets the miner reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MiningTarget {
    /// All frequent item sets.
    #[serde(alias = "s", alias = "a", alias = "sets", alias = "frequent")]
    All,
    /// Frequent item sets without a superset of equal support.
    #[serde(alias = "c")]
    Closed,
    /// Frequent item sets without any frequent superset.
    #[serde(alias = "m")]
    Maximal,
}

impl MiningTarget {
    pub const ALL: [MiningTarget; 3] = [Self::All, Self::Closed, Self::Maximal];

    /// Closed and maximal targets need the elimination-list checks.
    pub fn needs_elimination_check(self) -> bool {
        matches!(self, Self::Closed | Self::Maximal)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Closed => "closed",
            Self::Maximal => "maximal",
        }
    }
}

impl fmt::Display for MiningTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MiningTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "sets" | "frequent" | "s" | "a" => Ok(Self::All),
            "closed" | "c" => Ok(Self::Closed),
            "maximal" | "m" => Ok(Self::Maximal),
            other => Err(unknown("target", other)),
        }
    }
}

/// Pairwise preference relation used by pattern set reduction.
///
/// Rules compare a pattern A with a pattern B whose item set is a subset of
/// A's. The numeric suffix selects the covered-points tie breaker:
/// `0` compares `zA*cA` with `zB*cB`, `1` compares `(zA-1)*cA` with `(zB-1)*cB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceRule {
    /// Never prefer either pattern (no reduction).
    #[serde(alias = "x")]
    None,
    /// Excess coincidences, signature `(zB, cB-cA)`.
    #[serde(alias = "c")]
    Coins0,
    /// Excess coincidences, signature `(zB, cB-cA+1)`.
    #[serde(alias = "C")]
    Coins1,
    /// Excess items, signature `(zA-zB+2, cA)`.
    #[serde(alias = "i")]
    Items2,
    /// Covered points `zA*cA` versus `zB*cB`.
    #[serde(alias = "s")]
    Cover0,
    /// Covered points `(zA-1)*cA` versus `(zB-1)*cB`.
    #[serde(alias = "S")]
    Cover1,
    /// Combined rule, keeps both when neither excess test rejects.
    #[serde(alias = "l")]
    Lenient0,
    #[serde(alias = "L")]
    Lenient1,
    /// Combined rule, always forces a decision.
    #[serde(alias = "t")]
    Strict0,
    #[serde(alias = "T")]
    Strict1,
}

impl PreferenceRule {
    pub const ALL: [PreferenceRule; 10] = [
        Self::None,
        Self::Coins0,
        Self::Coins1,
        Self::Items2,
        Self::Cover0,
        Self::Cover1,
        Self::Lenient0,
        Self::Lenient1,
        Self::Strict0,
        Self::Strict1,
    ];

    /// Classic single-character identifier.
    pub fn code(self) -> char {
        match self {
            Self::None => 'x',
            Self::Coins0 => 'c',
            Self::Coins1 => 'C',
            Self::Items2 => 'i',
            Self::Cover0 => 's',
            Self::Cover1 => 'S',
            Self::Lenient0 => 'l',
            Self::Lenient1 => 'L',
            Self::Strict0 => 't',
            Self::Strict1 => 'T',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Coins0 => "coins0",
            Self::Coins1 => "coins1",
            Self::Items2 => "items2",
            Self::Cover0 => "cover0",
            Self::Cover1 => "cover1",
            Self::Lenient0 => "lenient0",
            Self::Lenient1 => "lenient1",
            Self::Strict0 => "strict0",
            Self::Strict1 => "strict1",
        }
    }
}

impl fmt::Display for PreferenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PreferenceRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rule| rule.name() == s || (s.len() == 1 && s.starts_with(rule.code())))
            .ok_or_else(|| unknown("reduction rule", s))
    }
}

/// Surrogate data generation method for transactional data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurrogateMethod {
    /// Keep the original data (a single trial suffices).
    #[serde(alias = "i", alias = "ident")]
    Identity,
    /// Random transactions with the original sizes and item frequencies.
    #[serde(alias = "r")]
    Random,
    /// Permutation by pair swaps, preserving item frequencies and sizes.
    #[serde(alias = "p", alias = "permute")]
    Swap,
    /// Column-wise shuffle of table-derived data.
    #[serde(alias = "s")]
    Shuffle,
}

impl SurrogateMethod {
    pub fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Random => "random",
            Self::Swap => "swap",
            Self::Shuffle => "shuffle",
        }
    }
}

impl fmt::Display for SurrogateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SurrogateMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" | "ident" | "i" => Ok(Self::Identity),
            "random" | "r" => Ok(Self::Random),
            "swap" | "permute" | "p" => Ok(Self::Swap),
            "shuffle" | "s" => Ok(Self::Shuffle),
            other => Err(unknown("surrogate method", other)),
        }
    }
}

/// Symmetric density around 0 for random displacements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomDensity {
    /// Rectangular density on `[-sigma, sigma]`.
    #[serde(alias = "u", alias = "r", alias = "rect", alias = "rectangular")]
    Uniform,
    /// Symmetric triangular density on `[-sigma, sigma]`.
    #[serde(alias = "t", alias = "triang", alias = "triangle")]
    Triangular,
    /// Normal density with standard deviation `sigma`.
    #[serde(alias = "g", alias = "n", alias = "gauss", alias = "normal")]
    Gaussian,
}

impl RandomDensity {
    pub fn name(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Triangular => "triangular",
            Self::Gaussian => "gaussian",
        }
    }
}

impl fmt::Display for RandomDensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RandomDensity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" | "rect" | "rectangular" | "u" | "r" => Ok(Self::Uniform),
            "triangular" | "triang" | "triangle" | "t" => Ok(Self::Triangular),
            "gaussian" | "gauss" | "normal" | "g" | "n" => Ok(Self::Gaussian),
            other => Err(unknown("random density", other)),
        }
    }
}

/// Minimum support of an item set, absolute or relative to the data size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportThreshold {
    /// Absolute number of (weighted) transactions.
    Absolute(u64),
    /// Percentage of the number of transactions.
    Percent(f64),
}

impl SupportThreshold {
    /// Resolve against a transaction count.
    ///
    /// Percentages round up (`ceil(0.01 * p * n)`); anything that resolves to
    /// zero or below is clamped to 1.
    pub fn resolve(self, transactions: usize) -> u64 {
        let raw = match self {
            Self::Absolute(count) => count as f64,
            Self::Percent(pct) => (0.01 * pct * transactions as f64).ceil(),
        };
        if raw.is_finite() && raw >= 1.0 {
            raw as u64
        } else {
            1
        }
    }
}

impl Default for SupportThreshold {
    fn default() -> Self {
        Self::Absolute(2)
    }
}

fn unknown(field: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: format!("unknown identifier '{value}'"),
    }
}
