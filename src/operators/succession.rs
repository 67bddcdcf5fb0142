use crate::individual::Individual;

/// Elitist truncation over parents and offspring.
///
/// The current population and the offspring buffer live in one contiguous slice,
/// parents first. Succession stable-sorts that slice by ascending tour weight, so the
/// first `population_count` entries become the new population and the remainder is
/// recycled as the next offspring buffer. An individual never loses its place to a
/// heavier one, and among equal weights the earlier entry stays ahead, which favours
/// incumbents over offspring.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElitistSuccession;

impl ElitistSuccession {
    pub fn new() -> Self {
        Self
    }

    /// Reorders `individuals` by ascending weight and returns the fittest.
    ///
    /// Returns `None` for an empty slice.
    pub fn apply<'a>(&self, individuals: &'a mut [Individual]) -> Option<&'a Individual> {
        individuals.sort_by_key(Individual::path_weight);
        individuals.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphMatrix;
    use crate::rng::RandomNumberGenerator;

    fn graph() -> GraphMatrix {
        GraphMatrix::new(
            vec![
                vec![0, 10, 15, 20],
                vec![10, 0, 35, 25],
                vec![15, 35, 0, 30],
                vec![20, 25, 30, 0],
            ],
            80,
        )
        .unwrap()
    }

    #[test]
    fn test_keeps_lightest_in_front() {
        let graph = graph();
        let mut individuals = vec![
            Individual::from_path(vec![0, 1, 2, 3], &graph).unwrap(), // 95
            Individual::from_path(vec![0, 2, 1, 3], &graph).unwrap(), // 95
            Individual::from_path(vec![0, 1, 3, 2], &graph).unwrap(), // 80
            Individual::from_path(vec![0, 2, 3, 1], &graph).unwrap(), // 80
        ];

        let best = ElitistSuccession::new().apply(&mut individuals).unwrap();
        assert_eq!(best.path_weight(), 80);

        let weights: Vec<u64> = individuals.iter().map(|i| i.path_weight()).collect();
        assert_eq!(weights, vec![80, 80, 95, 95]);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let graph = graph();
        let mut individuals = vec![
            Individual::from_path(vec![0, 1, 2, 3], &graph).unwrap(),
            Individual::from_path(vec![0, 3, 2, 1], &graph).unwrap(),
            Individual::from_path(vec![0, 1, 3, 2], &graph).unwrap(),
        ];

        ElitistSuccession::new().apply(&mut individuals);
        assert_eq!(individuals[1].path(), &[0, 1, 2, 3]);
        assert_eq!(individuals[2].path(), &[0, 3, 2, 1]);
    }

    #[test]
    fn test_best_never_gets_worse() {
        let graph = GraphMatrix::random_symmetric(
            12,
            100,
            1,
            &mut RandomNumberGenerator::from_seed(30),
        )
        .unwrap();
        let mut rng = RandomNumberGenerator::from_seed(31);
        let mut individuals: Vec<Individual> = (0..20)
            .map(|_| {
                let mut individual = Individual::new(12);
                individual.set_random_path(&mut rng);
                individual.update_path_weight(&graph);
                individual
            })
            .collect();
        let best_parent = individuals[..10].iter().map(|i| i.path_weight()).min().unwrap();

        ElitistSuccession::new().apply(&mut individuals);
        let best_survivor = individuals[..10].iter().map(|i| i.path_weight()).min().unwrap();
        assert!(best_survivor <= best_parent);
        assert!(individuals.windows(2).all(|w| w[0].path_weight() <= w[1].path_weight()));
    }

    #[test]
    fn test_empty_slice() {
        let mut individuals: Vec<Individual> = Vec::new();
        assert!(ElitistSuccession::new().apply(&mut individuals).is_none());
    }
}
