use crate::individual::Individual;
use crate::rng::RandomNumberGenerator;

/// Binary tournament selection.
///
/// The population's indices are shuffled and split into adjacent pairs. In every pair
/// the individual with the strictly lower tour weight wins; on a tie the first
/// contestant of the pair wins. Winners fill the mating pool in pairing order, one slot
/// per pair, so the pool always holds `population.len() / 2` distinct individuals.
///
/// The mating pool stores indices into the population it was built from. They are only
/// meaningful until the population is reordered by succession.
///
/// # Examples
///
/// ```
/// use gatsp::graph::GraphMatrix;
/// use gatsp::individual::Individual;
/// use gatsp::operators::TournamentSelection;
/// use gatsp::rng::RandomNumberGenerator;
///
/// let graph = GraphMatrix::new(
///     vec![
///         vec![0, 10, 15, 20],
///         vec![10, 0, 35, 25],
///         vec![15, 35, 0, 30],
///         vec![20, 25, 30, 0],
///     ],
///     80,
/// ).unwrap();
///
/// let population = vec![
///     Individual::from_path(vec![0, 1, 2, 3], &graph).unwrap(),
///     Individual::from_path(vec![0, 1, 3, 2], &graph).unwrap(),
///     Individual::from_path(vec![0, 2, 1, 3], &graph).unwrap(),
///     Individual::from_path(vec![0, 3, 2, 1], &graph).unwrap(),
/// ];
///
/// let mut rng = RandomNumberGenerator::from_seed(1);
/// let mut selection = TournamentSelection::new(population.len());
/// let mut mating_pool = Vec::new();
/// selection.select(&population, &mut mating_pool, &mut rng);
///
/// assert_eq!(mating_pool.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    contestants: Vec<usize>,
}

impl TournamentSelection {
    /// Creates a selection operator with scratch space for `population_count` contestants.
    pub fn new(population_count: usize) -> Self {
        Self {
            contestants: (0..population_count).collect(),
        }
    }

    /// Runs one round of tournaments over `population`, overwriting `mating_pool`.
    pub fn select(
        &mut self,
        population: &[Individual],
        mating_pool: &mut Vec<usize>,
        rng: &mut RandomNumberGenerator,
    ) {
        if self.contestants.len() != population.len() {
            self.contestants = (0..population.len()).collect();
        }
        rng.shuffle(&mut self.contestants);

        mating_pool.clear();
        mating_pool.extend(self.contestants.chunks_exact(2).map(|pair| {
            let (first, second) = (pair[0], pair[1]);
            if population[second].path_weight() < population[first].path_weight() {
                second
            } else {
                first
            }
        }));
    }
}
