//! Surrogate data generation for transactional data.
//!
//! A surrogate is a randomized copy of the input that keeps the marginal
//! statistics (item frequencies, transaction sizes) but destroys the
//! co-occurrence structure. Each trial gets its own `RandomSource`.

use assembly_core::errors::MiningError;
use assembly_core::types::collections::FxHashMap;
use assembly_core::{RandomDensity, SurrogateMethod};
use rand::distributions::{Distribution, Uniform};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Normal, Triangular};

use crate::data::{Item, TransactionDb};

/// Per-trial random stream plus the displacement density.
///
/// Streams are derived from `(seed, stream)`, so the numbers a trial sees
/// do not depend on which worker runs it.
pub struct RandomSource {
    rng: ChaCha8Rng,
    density: Density,
    sigma: f64,
    block_size: f64,
}

enum Density {
    Uniform(Uniform<f64>),
    Triangular(Triangular<f64>),
    Gaussian(Normal<f64>),
    Degenerate,
}

impl RandomSource {
    pub fn new(seed: u64, stream: u64, density: RandomDensity, sigma: f64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        let valid = sigma.is_finite() && sigma > 0.0;
        let density = match density {
            _ if !valid => Density::Degenerate,
            RandomDensity::Uniform => Density::Uniform(Uniform::new_inclusive(-sigma, sigma)),
            RandomDensity::Triangular => Triangular::new(-sigma, sigma, 0.0)
                .map(Density::Triangular)
                .unwrap_or(Density::Degenerate),
            RandomDensity::Gaussian => Normal::new(0.0, sigma)
                .map(Density::Gaussian)
                .unwrap_or(Density::Degenerate),
        };
        Self {
            rng,
            density,
            sigma,
            block_size: 0.03,
        }
    }

    pub fn with_block_size(mut self, block_size: f64) -> Self {
        self.block_size = block_size;
        self
    }

    /// One sample from the configured symmetric density around 0.
    pub fn sample(&mut self) -> f64 {
        match &self.density {
            Density::Uniform(d) => d.sample(&mut self.rng),
            Density::Triangular(d) => d.sample(&mut self.rng),
            Density::Gaussian(d) => d.sample(&mut self.rng),
            Density::Degenerate => 0.0,
        }
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Block size for blocked permutations of continuous-time data.
    pub fn block_size(&self) -> f64 {
        self.block_size
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}

/// Produces one randomized copy of a transaction database.
///
/// Implementations are shared by all estimator workers.
pub trait SurrogateGenerator<I: Item>: Send + Sync {
    fn generate(
        &self,
        db: &TransactionDb<I>,
        random: &mut RandomSource,
    ) -> Result<TransactionDb<I>, MiningError>;

    fn name(&self) -> &'static str;
}

/// Built-in generator for a surrogate method.
pub fn for_method<I: Item>(method: SurrogateMethod) -> Box<dyn SurrogateGenerator<I>> {
    match method {
        SurrogateMethod::Identity => Box::new(IdentitySurrogate),
        SurrogateMethod::Random => Box::new(RandomSurrogate),
        SurrogateMethod::Swap => Box::new(SwapSurrogate),
        SurrogateMethod::Shuffle => Box::new(ShuffleSurrogate),
    }
}

/// Keeps the original data.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentitySurrogate;

impl<I: Item> SurrogateGenerator<I> for IdentitySurrogate {
    fn generate(&self, db: &TransactionDb<I>, _random: &mut RandomSource) -> Result<TransactionDb<I>, MiningError> {
        Ok(db.clone())
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

/// Random transactions with the original sizes; items are drawn with
/// probability proportional to their frequency, without repetition.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSurrogate;

impl<I: Item> SurrogateGenerator<I> for RandomSurrogate {
    fn generate(&self, db: &TransactionDb<I>, random: &mut RandomSource) -> Result<TransactionDb<I>, MiningError> {
        let frequencies = db.item_frequencies();
        let rng = random.rng();
        let mut rows: Vec<Vec<I>> = Vec::with_capacity(db.len());
        for transaction in db.iter() {
            let picked = frequencies
                .choose_multiple_weighted(rng, transaction.len(), |(_, n)| *n as f64)
                .map_err(|e| MiningError::SurrogateFailed {
                    method: "random",
                    reason: e.to_string(),
                })?;
            rows.push(picked.map(|(item, _)| item.clone()).collect());
        }
        Ok(TransactionDb::new(rows))
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Permutation by pair swaps.
///
/// Picks two transactions and one item in each and exchanges the items
/// unless either transaction already holds the other's item. Item
/// frequencies and transaction sizes are preserved exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapSurrogate;

impl<I: Item> SurrogateGenerator<I> for SwapSurrogate {
    fn generate(&self, db: &TransactionDb<I>, random: &mut RandomSource) -> Result<TransactionDb<I>, MiningError> {
        let mut rows: Vec<Vec<I>> = db.transactions().to_vec();
        if rows.len() < 2 {
            return Ok(TransactionDb::new(rows));
        }
        let rng = random.rng();
        for _ in 0..db.occurrences() {
            let a = rng.gen_range(0..rows.len());
            let b = rng.gen_range(0..rows.len());
            if a == b || rows[a].is_empty() || rows[b].is_empty() {
                continue;
            }
            let i = rng.gen_range(0..rows[a].len());
            let j = rng.gen_range(0..rows[b].len());
            let (x, y) = (rows[a][i].clone(), rows[b][j].clone());
            if rows[a].contains(&y) || rows[b].contains(&x) {
                continue;
            }
            rows[a][i] = y;
            rows[b][j] = x;
        }
        Ok(TransactionDb::new(rows))
    }

    fn name(&self) -> &'static str {
        "swap"
    }
}

/// Column-wise shuffle of table-derived data.
///
/// Requires equal-length transactions in which every item occurs in one
/// column only. Each column is permuted independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShuffleSurrogate;

impl ShuffleSurrogate {
    /// Check that `db` looks like rows of a table.
    pub fn validate<I: Item>(db: &TransactionDb<I>) -> Result<(), MiningError> {
        let Some(width) = db.transactions().first().map(Vec::len) else {
            return Ok(());
        };
        if db.iter().any(|row| row.len() != width) {
            return Err(MiningError::NotTableDerived {
                reason: "transactions must have equal size".to_string(),
            });
        }
        let mut columns: FxHashMap<&I, usize> = FxHashMap::default();
        for row in db.iter() {
            for (col, item) in row.iter().enumerate() {
                if *columns.entry(item).or_insert(col) != col {
                    return Err(MiningError::NotTableDerived {
                        reason: format!("item {item:?} must occur in only one column"),
                    });
                }
            }
        }
        Ok(())
    }
}

impl<I: Item> SurrogateGenerator<I> for ShuffleSurrogate {
    fn generate(&self, db: &TransactionDb<I>, random: &mut RandomSource) -> Result<TransactionDb<I>, MiningError> {
        Self::validate(db)?;
        let mut rows: Vec<Vec<I>> = db.transactions().to_vec();
        let width = rows.first().map_or(0, Vec::len);
        let rng = random.rng();
        for col in 0..width {
            let mut column: Vec<I> = rows.iter().map(|row| row[col].clone()).collect();
            column.shuffle(rng);
            for (row, item) in rows.iter_mut().zip(column) {
                row[col] = item;
            }
        }
        Ok(TransactionDb::from_rows(rows))
    }

    fn name(&self) -> &'static str {
        "shuffle"
    }
}
