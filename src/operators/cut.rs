use crate::rng::RandomNumberGenerator;

/// An inclusive segment `[first, second]` of a tour with `first < second`.
///
/// Both crossover and mutation operate on such a segment. A segment is never empty
/// and never a single position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutPoints {
    first: usize,
    second: usize,
}

impl CutPoints {
    /// Creates cut points from explicit indices.
    ///
    /// `first < second` is an invariant of every operator; breaking it is a
    /// programming error and is caught by a debug assertion.
    pub fn new(first: usize, second: usize) -> Self {
        debug_assert!(
            first < second,
            "cut points must satisfy first < second, got ({}, {})",
            first,
            second
        );
        Self { first, second }
    }

    /// Draws cut points for a tour of `vertex_count` vertices.
    ///
    /// `first` is uniform in `[0, n-2]` and `second` uniform in `[first+1, n-1]`.
    /// Requires at least two vertices.
    pub fn random(vertex_count: usize, rng: &mut RandomNumberGenerator) -> Self {
        debug_assert!(vertex_count >= 2, "cut points need at least two vertices");
        let first = rng.gen_index(vertex_count - 1);
        let second = rng.gen_inclusive(first + 1, vertex_count - 1);
        Self::new(first, second)
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn second(&self) -> usize {
        self.second
    }

    /// Number of positions covered, both ends included.
    pub fn len(&self) -> usize {
        self.second - self.first + 1
    }
}
