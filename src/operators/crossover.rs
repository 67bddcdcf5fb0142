use crate::rng::RandomNumberGenerator;

use super::cut::CutPoints;

/// Ordered crossover (OX).
///
/// For parents `P1`, `P2` and a segment `[i1, i2]`:
///
/// - child 1 copies `P2[i1..=i2]` into the same positions, child 2 copies `P1[i1..=i2]`;
/// - the remaining positions of each child, starting at `(i2 + 1) mod n` and wrapping,
///   are filled with the *other* parent's vertices in the order they appear in that
///   parent from `(i2 + 1) mod n` onwards, skipping vertices already in the segment.
///
/// Both children are permutations whenever both parents are: the fill step checks
/// segment membership before placing a vertex and walks exactly `n` parent positions.
///
/// # Examples
///
/// ```
/// use gatsp::operators::{CutPoints, OrderedCrossover};
///
/// let mut crossover = OrderedCrossover::new(5);
/// let mut child1 = vec![0; 5];
/// let mut child2 = vec![0; 5];
///
/// crossover.crossover_at(
///     &[0, 1, 2, 3, 4],
///     &[4, 3, 2, 1, 0],
///     &mut child1,
///     &mut child2,
///     CutPoints::new(1, 3),
/// );
///
/// assert_eq!(child1, vec![0, 3, 2, 1, 4]);
/// assert_eq!(child2, vec![4, 1, 2, 3, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct OrderedCrossover {
    /// Membership flags for the vertices of the copied segment, all `false` between calls
    in_segment: Vec<bool>,
}

impl OrderedCrossover {
    /// Creates a crossover operator for tours of `vertex_count` vertices.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            in_segment: vec![false; vertex_count],
        }
    }

    /// Crosses two parents at randomly drawn cut points, writing both children.
    ///
    /// Tours with fewer than two vertices have a single ordering; the children are
    /// plain copies of the parents in that case.
    pub fn crossover(
        &mut self,
        parent1: &[usize],
        parent2: &[usize],
        child1: &mut [usize],
        child2: &mut [usize],
        rng: &mut RandomNumberGenerator,
    ) {
        if parent1.len() < 2 {
            child1.copy_from_slice(parent2);
            child2.copy_from_slice(parent1);
            return;
        }
        let cut = CutPoints::random(parent1.len(), rng);
        self.crossover_at(parent1, parent2, child1, child2, cut);
    }

    /// Crosses two parents at the given cut points, writing both children.
    pub fn crossover_at(
        &mut self,
        parent1: &[usize],
        parent2: &[usize],
        child1: &mut [usize],
        child2: &mut [usize],
        cut: CutPoints,
    ) {
        debug_assert!(cut.second() < parent1.len(), "cut point out of range");
        debug_assert_eq!(parent1.len(), parent2.len());
        if self.in_segment.len() != parent1.len() {
            self.in_segment = vec![false; parent1.len()];
        }

        let segment = cut.first()..=cut.second();
        child1[segment.clone()].copy_from_slice(&parent2[segment.clone()]);
        child2[segment.clone()].copy_from_slice(&parent1[segment]);

        self.fill_missing_section(parent1, child1, cut);
        self.fill_missing_section(parent2, child2, cut);

        debug_assert!(crate::individual::is_valid_permutation(child1));
        debug_assert!(crate::individual::is_valid_permutation(child2));
    }

    /// Fills every position of `child` outside the segment from `parent`, preserving
    /// the parent's relative order and skipping vertices already in the segment.
    fn fill_missing_section(&mut self, parent: &[usize], child: &mut [usize], cut: CutPoints) {
        let n = parent.len();
        let (start, end) = (cut.first(), cut.second());

        for &vertex in &child[start..=end] {
            self.in_segment[vertex] = true;
        }

        let mut child_index = (end + 1) % n;
        let mut parent_index = (end + 1) % n;
        while child_index != start {
            let vertex = parent[parent_index];
            if !self.in_segment[vertex] {
                child[child_index] = vertex;
                child_index = (child_index + 1) % n;
            }
            parent_index = (parent_index + 1) % n;
        }

        for &vertex in &child[start..=end] {
            self.in_segment[vertex] = false;
        }
    }
}
