//! # Individual
//!
//! An `Individual` is one candidate tour: a permutation of the graph's vertices plus
//! the cached weight of the cycle it describes. Individuals are allocated once per run
//! with room for every vertex and then overwritten in place generation after
//! generation.
//!
//! The cached weight is only as fresh as the last call to
//! [`Individual::update_path_weight`]. Operators that edit the path through
//! [`Individual::path_mut`] must refresh it before anyone reads the weight again.
//!
//! ## Example
//!
//! ```rust
//! use gatsp::graph::{Graph, GraphMatrix};
//! use gatsp::individual::{is_valid_permutation, Individual};
//! use gatsp::rng::RandomNumberGenerator;
//!
//! let graph = GraphMatrix::new(
//!     vec![vec![0, 2, 9], vec![2, 0, 6], vec![9, 6, 0]],
//!     17,
//! ).unwrap();
//! let mut rng = RandomNumberGenerator::from_seed(1);
//!
//! let mut individual = Individual::new(graph.vertex_count());
//! individual.set_random_path(&mut rng);
//! individual.update_path_weight(&graph);
//!
//! assert!(is_valid_permutation(individual.path()));
//! assert_eq!(individual.path()[0], 0);
//! assert_eq!(individual.path_weight(), 17);
//! ```

use crate::error::{GeneticError, Result};
use crate::graph::Graph;
use crate::rng::RandomNumberGenerator;

/// A candidate tour and its cached weight. Lower weight is fitter.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    path: Vec<usize>,
    weight: u64,
}

impl Individual {
    /// Creates an individual holding the identity tour `0, 1, ..., n-1`.
    ///
    /// The weight is zero until [`update_path_weight`](Self::update_path_weight) runs.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            path: (0..vertex_count).collect(),
            weight: 0,
        }
    }

    /// Creates an individual from an explicit tour and computes its weight.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvalidPermutation` if `path` is not a permutation of the
    /// graph's vertices.
    pub fn from_path<G: Graph>(path: Vec<usize>, graph: &G) -> Result<Self> {
        validate_permutation(&path, graph.vertex_count())?;
        let weight = graph.tour_weight(&path);
        Ok(Self { path, weight })
    }

    /// Resets the tour to the identity and shuffles every position except the first.
    ///
    /// Vertex 0 stays at index 0 as the cycle's anchor; rotations of a cycle describe the
    /// same tour, so fixing the start loses nothing. The cached weight is stale afterwards.
    pub fn set_random_path(&mut self, rng: &mut RandomNumberGenerator) {
        for (i, vertex) in self.path.iter_mut().enumerate() {
            *vertex = i;
        }
        if self.path.len() > 2 {
            rng.shuffle(&mut self.path[1..]);
        }
    }

    /// Recomputes the cached weight from the current tour.
    pub fn update_path_weight<G: Graph + ?Sized>(&mut self, graph: &G) {
        self.weight = graph.tour_weight(&self.path);
    }

    /// Returns the cached tour weight without recomputing it.
    #[inline]
    pub fn path_weight(&self) -> u64 {
        self.weight
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Mutable access to the tour. The cached weight is stale after any edit.
    pub fn path_mut(&mut self) -> &mut [usize] {
        &mut self.path
    }

    pub fn vertex_count(&self) -> usize {
        self.path.len()
    }

    /// Overwrites this individual with `other` without reallocating.
    pub fn copy_from(&mut self, other: &Individual) {
        self.path.copy_from_slice(&other.path);
        self.weight = other.weight;
    }
}

/// Returns `true` if `path` holds every value of `0..path.len()` exactly once.
pub fn is_valid_permutation(path: &[usize]) -> bool {
    let mut sorted = path.to_vec();
    sorted.sort_unstable();
    sorted.iter().enumerate().all(|(i, &v)| i == v)
}

/// Checks that `path` is a permutation of `0..vertex_count`.
///
/// Sorting makes this O(n log n); it is meant for tests and diagnostics, not for the
/// generational loop.
///
/// # Errors
///
/// Returns `GeneticError::InvalidPermutation` describing the first problem found.
pub fn validate_permutation(path: &[usize], vertex_count: usize) -> Result<()> {
    if path.len() != vertex_count {
        return Err(GeneticError::InvalidPermutation(format!(
            "Path has {} vertices, expected {}",
            path.len(),
            vertex_count
        )));
    }

    let mut sorted = path.to_vec();
    sorted.sort_unstable();
    if let Some(&out_of_range) = sorted.iter().find(|&&v| v >= vertex_count) {
        return Err(GeneticError::InvalidPermutation(format!(
            "Vertex {} is out of range for {} vertices",
            out_of_range, vertex_count
        )));
    }
    if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(GeneticError::InvalidPermutation(format!(
            "Vertex {} appears more than once",
            pair[0]
        )));
    }

    Ok(())
}
