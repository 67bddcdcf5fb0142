//! # Graph
//!
//! The `Graph` trait is the read-only view the solver has of a TSP instance: how many
//! vertices there are, what it costs to travel between two of them, and the best known
//! tour weight used to report the percentage relative deviation of a result.
//!
//! `GraphMatrix` is a ready-made implementation backed by a dense, validated weight
//! matrix. Instance loading lives outside this crate; callers build a `GraphMatrix` from
//! whatever source they read, or implement `Graph` for their own storage.
//!
//! ## Example
//!
//! ```rust
//! use gatsp::graph::{Graph, GraphMatrix};
//!
//! let graph = GraphMatrix::new(
//!     vec![
//!         vec![0, 10, 15],
//!         vec![10, 0, 20],
//!         vec![15, 20, 0],
//!     ],
//!     45,
//! ).unwrap();
//!
//! assert_eq!(graph.vertex_count(), 3);
//! assert_eq!(graph.weight(0, 2), 15);
//! assert_eq!(graph.tour_weight(&[0, 1, 2]), 45);
//! ```

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// A complete, symmetric, weighted graph.
///
/// Implementations must be `Sync` because offspring weights may be refreshed from
/// several rayon workers at once.
pub trait Graph: Sync {
    /// Number of vertices, at least 1.
    fn vertex_count(&self) -> usize;

    /// Weight of the edge between `from` and `to`. Must equal `weight(to, from)`.
    fn weight(&self, from: usize, to: usize) -> u64;

    /// Best known tour weight, strictly positive.
    fn optimum(&self) -> u64;

    /// Total weight of the cycle visiting `path` in order and returning to `path[0]`.
    fn tour_weight(&self, path: &[usize]) -> u64 {
        let Some((&first, _)) = path.split_first() else {
            return 0;
        };
        let inner: u64 = path
            .windows(2)
            .map(|edge| self.weight(edge[0], edge[1]))
            .sum();
        inner + self.weight(path[path.len() - 1], first)
    }
}

/// A dense weight matrix with a known optimum.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphMatrix {
    vertex_count: usize,
    weights: Vec<u64>,
    optimum: u64,
}

impl GraphMatrix {
    /// Builds a graph from a square, symmetric matrix of edge weights.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvalidGraph` if the matrix is empty, not square, not
    /// symmetric, or if `optimum` is zero.
    pub fn new(rows: Vec<Vec<u64>>, optimum: u64) -> Result<Self> {
        let vertex_count = rows.len();
        if vertex_count == 0 {
            return Err(GeneticError::InvalidGraph(
                "Graph must have at least one vertex".to_string(),
            ));
        }
        if optimum == 0 {
            return Err(GeneticError::InvalidGraph(
                "Optimum must be a positive tour weight".to_string(),
            ));
        }

        let mut weights = Vec::with_capacity(vertex_count * vertex_count);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != vertex_count {
                return Err(GeneticError::InvalidGraph(format!(
                    "Row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    vertex_count
                )));
            }
            weights.extend_from_slice(row);
        }

        for i in 0..vertex_count {
            for j in (i + 1)..vertex_count {
                let forward = weights[i * vertex_count + j];
                let backward = weights[j * vertex_count + i];
                if forward != backward {
                    return Err(GeneticError::InvalidGraph(format!(
                        "Weights are not symmetric: w({}, {}) = {} but w({}, {}) = {}",
                        i, j, forward, j, i, backward
                    )));
                }
            }
        }

        Ok(Self {
            vertex_count,
            weights,
            optimum,
        })
    }

    /// Generates a random complete symmetric instance with weights in `[1, max_weight]`.
    ///
    /// The optimum of a random instance is unknown to the generator, so the caller
    /// supplies the value PRD should be reported against.
    pub fn random_symmetric(
        vertex_count: usize,
        max_weight: u64,
        optimum: u64,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Self> {
        if max_weight == 0 {
            return Err(GeneticError::InvalidGraph(
                "Maximum edge weight must be positive".to_string(),
            ));
        }

        let mut rows = vec![vec![0u64; vertex_count]; vertex_count];
        for i in 0..vertex_count {
            for j in (i + 1)..vertex_count {
                let w = 1 + rng.gen_index(max_weight as usize) as u64;
                rows[i][j] = w;
                rows[j][i] = w;
            }
        }

        Self::new(rows, optimum)
    }
}

impl Graph for GraphMatrix {
    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    fn weight(&self, from: usize, to: usize) -> u64 {
        self.weights[from * self.vertex_count + to]
    }

    fn optimum(&self) -> u64 {
        self.optimum
    }
}
