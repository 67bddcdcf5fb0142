use crate::graph::Graph;
use crate::individual::Individual;
use crate::rng::RandomNumberGenerator;

use super::cut::CutPoints;

/// Inversion mutation: reverses the tour between two cut points, both included.
///
/// Reversing a segment of a cycle replaces exactly two edges, and applying the same
/// inversion twice restores the original tour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InversionMutation {
    probability: f64,
}

impl InversionMutation {
    /// Creates a mutation operator firing with `probability` per individual.
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Reverses `path[first..=second]` in place.
    #[inline]
    pub fn invert(path: &mut [usize], cut: CutPoints) {
        path[cut.first()..=cut.second()].reverse();
    }

    /// Mutates the individual with the configured probability and refreshes its weight.
    ///
    /// Returns `true` if the individual was mutated.
    pub fn mutate<G: Graph + ?Sized>(
        &self,
        individual: &mut Individual,
        graph: &G,
        rng: &mut RandomNumberGenerator,
    ) -> bool {
        let vertex_count = individual.vertex_count();
        if vertex_count < 2 || !rng.chance(self.probability) {
            return false;
        }

        let cut = CutPoints::random(vertex_count, rng);
        Self::invert(individual.path_mut(), cut);
        individual.update_path_weight(graph);
        true
    }
}
