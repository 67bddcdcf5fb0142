//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct is the single random source of a solver run.
//! It wraps the `rand` crate's `StdRng` so that a run can either be seeded from
//! system entropy or from a fixed seed for reproducible tests and benchmarks.
//!
//! ## Example
//!
//! ```rust
//! use gatsp::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let index = rng.gen_index(10);
//! assert!(index < 10);
//!
//! let mut values = vec![1, 2, 3, 4];
//! rng.shuffle(&mut values);
//! values.sort();
//! assert_eq!(values, vec![1, 2, 3, 4]);
//! ```

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// A wrapper around the `rand` crate's `StdRng` exposing the draws the solver needs.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// Two generators built from the same seed produce the same sequence, which makes
    /// whole solver runs reproducible.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns a uniformly distributed index in `[0, upper)`.
    ///
    /// # Panics
    ///
    /// Panics if `upper` is zero.
    pub fn gen_index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }

    /// Returns a uniformly distributed value in `[low, high]`.
    pub fn gen_inclusive(&mut self, low: usize, high: usize) -> usize {
        self.rng.gen_range(low..=high)
    }

    /// Returns `true` with the given probability.
    ///
    /// A probability of `0.0` never fires and `1.0` always fires.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }

    /// Shuffles the slice in place, uniformly over all permutations.
    pub fn shuffle<T>(&mut self, values: &mut [T]) {
        values.shuffle(&mut self.rng);
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
