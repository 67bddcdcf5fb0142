//! # Path
//!
//! The value a solver run hands back: the best tour found, its weight, and its
//! percentage relative deviation (PRD) from the graph's known optimum.

use std::fmt;

use crate::individual::Individual;

/// Percentage relative deviation of `weight` from `optimum`.
///
/// `100 * (weight - optimum) / optimum`, computed in floating point. Zero means
/// optimal, positive means heavier than the optimum, negative means the supplied
/// optimum was not actually optimal.
pub fn prd(weight: u64, optimum: u64) -> f64 {
    100.0 * relative_error(weight, optimum)
}

/// Fractional deviation `(weight - optimum) / optimum`.
pub fn relative_error(weight: u64, optimum: u64) -> f64 {
    (weight as f64 - optimum as f64) / optimum as f64
}

/// The best tour of a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Tour as an ordered permutation of vertex indices.
    pub vertices: Vec<usize>,
    /// Total weight of the cycle, closing edge included.
    pub weight: u64,
    /// Percentage relative deviation from the optimum.
    pub prd: f64,
}

impl Path {
    pub fn new(vertices: Vec<usize>, weight: u64, optimum: u64) -> Self {
        Self {
            vertices,
            weight,
            prd: prd(weight, optimum),
        }
    }

    pub fn from_individual(individual: &Individual, optimum: u64) -> Self {
        Self::new(
            individual.path().to_vec(),
            individual.path_weight(),
            optimum,
        )
    }

    /// Fractional deviation from the optimum, `prd / 100`.
    pub fn relative_error(&self) -> f64 {
        self.prd / 100.0
    }
}

impl fmt::Display for Path {
    /// Formats the cycle as `0->3->1->2->0 (weight 80, prd 0.00%)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for vertex in &self.vertices {
            write!(f, "{}->", vertex)?;
        }
        if let Some(first) = self.vertices.first() {
            write!(f, "{}", first)?;
        }
        write!(f, " (weight {}, prd {:.2}%)", self.weight, self.prd)
    }
}
