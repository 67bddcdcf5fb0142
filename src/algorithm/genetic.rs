use rayon::prelude::*;
use tracing::instrument;

use super::{
    path::{prd, Path},
    termination::{TerminationPolicy, TerminationReason},
};
use crate::{
    error::{GeneticError, OptionExt, Result},
    graph::Graph,
    individual::Individual,
    operators::{ElitistSuccession, InversionMutation, OrderedCrossover, TournamentSelection},
    params::AlgorithmParams,
    rng::RandomNumberGenerator,
    timer::{Stopwatch, Timer},
};

/// Summary of the most recent completed run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Number of generational steps executed.
    pub generations: usize,
    /// Condition that ended the run.
    pub termination: TerminationReason,
    /// Wall-clock time of the run in milliseconds.
    pub elapsed_ms: u64,
    /// Weight of the best tour found.
    pub best_weight: u64,
}

/// Genetic search for a short Hamiltonian cycle of a borrowed graph.
///
/// The algorithm owns every individual of the run in a single buffer: the first
/// `population_count` entries are the current population, the tail is the offspring
/// buffer. Each generation
///
/// 1. mutates the current population with inversion mutation,
/// 2. fills the mating pool with binary tournament winners,
/// 3. writes ordered-crossover offspring into the tail,
/// 4. stable-sorts the whole buffer by weight, so the fittest `population_count`
///    become the next population (elitist truncation),
///
/// and then consults the [`TerminationPolicy`]. Tours are overwritten in place; no
/// path is reallocated while a run is in progress.
///
/// # Examples
///
/// ```
/// use gatsp::algorithm::GeneticAlgorithm;
/// use gatsp::graph::GraphMatrix;
/// use gatsp::params::AlgorithmParams;
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
/// let params = AlgorithmParams::new(5_000, None, 1.0, 0.0, 8).unwrap();
///
/// let mut algorithm =
///     GeneticAlgorithm::new(&graph, params, RandomNumberGenerator::from_seed(1)).unwrap();
/// let path = algorithm.solve_tsp().unwrap();
///
/// assert_eq!(path.weight, 80);
/// assert_eq!(path.prd, 0.0);
/// ```
pub struct GeneticAlgorithm<'g, G, T = Stopwatch>
where
    G: Graph,
    T: Timer,
{
    graph: &'g G,
    params: AlgorithmParams,
    vertex_count: usize,
    population_count: usize,
    /// Current population followed by the offspring buffer
    individuals: Vec<Individual>,
    /// Indices into the current population; stale after succession
    mating_pool: Vec<usize>,
    selection: TournamentSelection,
    crossover: OrderedCrossover,
    mutation: InversionMutation,
    succession: ElitistSuccession,
    termination: TerminationPolicy,
    rng: RandomNumberGenerator,
    timer: T,
    fittest: Option<Individual>,
    generation: usize,
    iters_without_improvement: usize,
    report: Option<RunReport>,
}

impl<'g, G: Graph> GeneticAlgorithm<'g, G, Stopwatch> {
    /// Creates an algorithm that measures its time budget with a [`Stopwatch`].
    ///
    /// The population is randomized here so it can be inspected or stepped by hand;
    /// [`solve_tsp`](GeneticAlgorithm::solve_tsp) draws a fresh one before it starts.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `params` fail validation and
    /// `GeneticError::InvalidGraph` if the graph has no vertices or a zero optimum.
    pub fn new(graph: &'g G, params: AlgorithmParams, rng: RandomNumberGenerator) -> Result<Self> {
        Self::with_timer(graph, params, rng, Stopwatch::new())
    }
}

impl<'g, G: Graph, T: Timer> GeneticAlgorithm<'g, G, T> {
    /// Creates an algorithm that measures its time budget with `timer`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `params` fail validation and
    /// `GeneticError::InvalidGraph` if the graph has no vertices or a zero optimum.
    pub fn with_timer(
        graph: &'g G,
        params: AlgorithmParams,
        rng: RandomNumberGenerator,
        timer: T,
    ) -> Result<Self> {
        params.validate()?;

        let vertex_count = graph.vertex_count();
        if vertex_count == 0 {
            return Err(GeneticError::InvalidGraph(
                "Graph must have at least one vertex".to_string(),
            ));
        }
        if graph.optimum() == 0 {
            return Err(GeneticError::InvalidGraph(
                "Optimum must be a positive tour weight".to_string(),
            ));
        }

        let population_count = params.population_count();
        let total = population_count + params.next_generation_count();
        let termination = TerminationPolicy::new(&params, vertex_count, graph.optimum());

        let mut algorithm = Self {
            graph,
            vertex_count,
            population_count,
            individuals: vec![Individual::new(vertex_count); total],
            mating_pool: Vec::with_capacity(params.mating_pool_size()),
            selection: TournamentSelection::new(population_count),
            crossover: OrderedCrossover::new(vertex_count),
            mutation: InversionMutation::new(params.mutation_probability()),
            succession: ElitistSuccession::new(),
            termination,
            rng,
            timer,
            fittest: None,
            generation: 0,
            iters_without_improvement: 0,
            report: None,
            params,
        };
        for offspring in &mut algorithm.individuals[population_count..] {
            offspring.update_path_weight(graph);
        }
        algorithm.initialize_population();
        Ok(algorithm)
    }

    /// Runs the generational loop until the termination policy fires and returns the
    /// fittest tour found.
    ///
    /// Each call starts a fresh run with a newly randomized population; the random
    /// source carries over, so consecutive runs differ.
    #[instrument(
        level = "info",
        skip(self),
        fields(
            vertex_count = self.vertex_count,
            population_count = self.population_count,
            offspring_count = self.params.next_generation_count()
        )
    )]
    pub fn solve_tsp(&mut self) -> Result<Path> {
        self.timer.start();
        self.initialize_population();
        tracing::info!(
            optimum = self.graph.optimum(),
            max_execution_time_ms = self.params.max_execution_time_ms(),
            min_error = ?self.termination.min_error(),
            "Starting genetic search"
        );

        let termination = loop {
            self.step();
            if let Some(reason) = self.termination_reason() {
                break reason;
            }
        };

        let result = self.result()?;
        let elapsed_ms = self.timer.elapsed_ms();
        tracing::info!(
            reason = ?termination,
            generations = self.generation,
            elapsed_ms,
            weight = result.weight,
            prd = result.prd,
            "Genetic search finished"
        );

        self.report = Some(RunReport {
            generations: self.generation,
            termination,
            elapsed_ms,
            best_weight: result.weight,
        });
        Ok(result)
    }

    /// Gives every individual of the current population a fresh random tour and
    /// forgets the fittest individual and all counters of a previous run.
    pub fn initialize_population(&mut self) {
        for individual in &mut self.individuals[..self.population_count] {
            individual.set_random_path(&mut self.rng);
            individual.update_path_weight(self.graph);
        }
        self.mating_pool.clear();
        self.fittest = None;
        self.generation = 0;
        self.iters_without_improvement = 0;
        self.report = None;
    }

    /// Executes one generation: mutation, selection, crossover, succession.
    pub fn step(&mut self) {
        let mutated = self.execute_mutations();
        self.create_mating_pool();
        self.execute_crossover();
        let improved = self.create_new_population();
        self.generation += 1;

        tracing::trace!(
            generation = self.generation,
            mutated,
            best = self.fittest_weight(),
            "Generation complete"
        );
        if improved {
            if let Some(weight) = self.fittest_weight() {
                tracing::debug!(
                    generation = self.generation,
                    weight,
                    prd = prd(weight, self.graph.optimum()),
                    "Fittest individual improved"
                );
            }
        }
    }

    /// Evaluates the termination policy against the current state of the run.
    pub fn termination_reason(&self) -> Option<TerminationReason> {
        self.termination.check(
            self.fittest_weight(),
            self.timer.elapsed_ms(),
            self.iters_without_improvement,
        )
    }

    /// Applies inversion mutation to the current population. Returns how many
    /// individuals were mutated.
    fn execute_mutations(&mut self) -> usize {
        let mut mutated = 0;
        for individual in &mut self.individuals[..self.population_count] {
            if self.mutation.mutate(individual, self.graph, &mut self.rng) {
                mutated += 1;
            }
        }
        mutated
    }

    fn create_mating_pool(&mut self) {
        self.selection.select(
            &self.individuals[..self.population_count],
            &mut self.mating_pool,
            &mut self.rng,
        );
    }

    /// Fills the offspring buffer, two children per pair of distinct mating-pool
    /// parents, then refreshes the children's weights.
    fn execute_crossover(&mut self) {
        let pool_size = self.mating_pool.len();
        debug_assert!(pool_size >= 2, "mating pool needs two distinct parents");

        let (population, offspring) = self.individuals.split_at_mut(self.population_count);
        for children in offspring.chunks_exact_mut(2) {
            let first = self.rng.gen_index(pool_size);
            let mut second = self.rng.gen_index(pool_size);
            while second == first {
                second = self.rng.gen_index(pool_size);
            }

            let parent1 = &population[self.mating_pool[first]];
            let parent2 = &population[self.mating_pool[second]];
            let (child1, child2) = children.split_at_mut(1);
            self.crossover.crossover(
                parent1.path(),
                parent2.path(),
                child1[0].path_mut(),
                child2[0].path_mut(),
                &mut self.rng,
            );
        }

        let graph = self.graph;
        if offspring.len() >= self.params.parallel_threshold() {
            offspring
                .par_iter_mut()
                .for_each(|child| child.update_path_weight(graph));
        } else {
            for child in offspring.iter_mut() {
                child.update_path_weight(graph);
            }
        }
    }

    /// Elitist truncation over parents and offspring. Returns `true` if the fittest
    /// individual of the run improved.
    fn create_new_population(&mut self) -> bool {
        let Some(best) = self.succession.apply(&mut self.individuals) else {
            return false;
        };

        let improved = match &self.fittest {
            Some(fittest) => best.path_weight() < fittest.path_weight(),
            None => true,
        };
        if improved {
            match &mut self.fittest {
                Some(fittest) => fittest.copy_from(best),
                slot @ None => *slot = Some(best.clone()),
            }
        }

        if improved {
            self.iters_without_improvement = 0;
        } else {
            self.iters_without_improvement += 1;
        }
        improved
    }

    /// Returns the fittest tour found so far as a [`Path`].
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::EmptyPopulation` if no generation has completed yet.
    pub fn result(&self) -> Result<Path> {
        let fittest = self
            .fittest
            .as_ref()
            .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
        Ok(Path::from_individual(fittest, self.graph.optimum()))
    }

    /// The fittest individual of the run so far, if a generation has completed.
    pub fn fittest(&self) -> Option<&Individual> {
        self.fittest.as_ref()
    }

    fn fittest_weight(&self) -> Option<u64> {
        self.fittest.as_ref().map(Individual::path_weight)
    }

    /// The current population, sorted by ascending weight after every generation.
    pub fn population(&self) -> &[Individual] {
        &self.individuals[..self.population_count]
    }

    /// The offspring staged by the most recent generation that did not survive.
    pub fn next_generation(&self) -> &[Individual] {
        &self.individuals[self.population_count..]
    }

    /// Indices into [`population`](Self::population) of the last tournament winners.
    ///
    /// Succession reorders the population, so after a completed `step` these indices
    /// no longer refer to the individuals that won.
    pub fn mating_pool(&self) -> &[usize] {
        &self.mating_pool
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn params(&self) -> &AlgorithmParams {
        &self.params
    }

    /// Summary of the last completed `solve_tsp` call.
    pub fn report(&self) -> Option<&RunReport> {
        self.report.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphMatrix;
    use crate::individual::is_valid_permutation;
    use crate::params::OffspringPolicy;
    use std::cell::Cell;

    /// Advances by a fixed amount every time it is read.
    struct TickingTimer {
        now: Cell<u64>,
        tick: u64,
    }

    impl TickingTimer {
        fn new(tick: u64) -> Self {
            Self {
                now: Cell::new(0),
                tick,
            }
        }
    }

    impl Timer for TickingTimer {
        fn start(&mut self) {
            self.now.set(0);
        }

        fn elapsed_ms(&self) -> u64 {
            let now = self.now.get() + self.tick;
            self.now.set(now);
            now
        }
    }

    fn square() -> GraphMatrix {
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

    fn random_graph(n: usize, seed: u64) -> GraphMatrix {
        GraphMatrix::random_symmetric(n, 100, 1, &mut RandomNumberGenerator::from_seed(seed))
            .unwrap()
    }

    fn assert_consistent<G: Graph>(individuals: &[Individual], graph: &G) {
        for individual in individuals {
            assert!(is_valid_permutation(individual.path()));
            assert_eq!(individual.path_weight(), graph.tour_weight(individual.path()));
        }
    }

    #[test]
    fn test_converges_on_square() {
        let graph = square();
        let params = AlgorithmParams::new(5_000, None, 1.0, 0.0, 8).unwrap();
        let mut algorithm =
            GeneticAlgorithm::new(&graph, params, RandomNumberGenerator::from_seed(3)).unwrap();

        let path = algorithm.solve_tsp().unwrap();
        assert_eq!(path.weight, 80);
        assert_eq!(path.prd, 0.0);
        assert_eq!(graph.tour_weight(&path.vertices), 80);
        assert_eq!(
            algorithm.report().unwrap().termination,
            TerminationReason::OptimumReached
        );
    }

    #[test]
    fn test_buffers_stay_valid_across_generations() {
        let graph = random_graph(20, 40);
        let params = AlgorithmParams::builder()
            .population_count(16)
            .mutation_probability(0.5)
            .build()
            .unwrap();
        let mut algorithm =
            GeneticAlgorithm::new(&graph, params, RandomNumberGenerator::from_seed(41)).unwrap();

        assert_consistent(algorithm.population(), &graph);
        for _ in 0..30 {
            algorithm.step();
            assert_eq!(algorithm.population().len(), 16);
            assert_eq!(algorithm.next_generation().len(), 16);
            assert_eq!(algorithm.mating_pool().len(), 8);
            assert_consistent(algorithm.population(), &graph);
            assert_consistent(algorithm.next_generation(), &graph);
        }
    }

    #[test]
    fn test_offspring_weights_consistent_after_construction() {
        let graph = random_graph(10, 17);
        let params = AlgorithmParams::new(1_000, None, 0.8, 0.05, 8).unwrap();
        let algorithm =
            GeneticAlgorithm::new(&graph, params, RandomNumberGenerator::from_seed(19)).unwrap();

        assert_eq!(algorithm.next_generation().len(), 8);
        assert_consistent(algorithm.next_generation(), &graph);
        assert_consistent(algorithm.population(), &graph);
    }

    #[test]
    fn test_fittest_is_monotone() {
        let graph = random_graph(25, 50);
        let params = AlgorithmParams::builder()
            .population_count(20)
            .mutation_probability(0.3)
            .build()
            .unwrap();
        let mut algorithm =
            GeneticAlgorithm::new(&graph, params, RandomNumberGenerator::from_seed(51)).unwrap();

        let mut previous = u64::MAX;
        for _ in 0..50 {
            algorithm.step();
            let weight = algorithm.fittest().unwrap().path_weight();
            assert!(weight <= previous);
            previous = weight;
        }
    }

    #[test]
    fn test_population_sorted_after_step() {
        let graph = random_graph(12, 60);
        let params = AlgorithmParams::builder()
            .population_count(12)
            .build()
            .unwrap();
        let mut algorithm =
            GeneticAlgorithm::new(&graph, params, RandomNumberGenerator::from_seed(61)).unwrap();

        algorithm.step();
        let population = algorithm.population();
        assert!(population
            .windows(2)
            .all(|w| w[0].path_weight() <= w[1].path_weight()));
        assert!(population[0].path_weight() <= algorithm.next_generation()[0].path_weight());
    }

    #[test]
    fn test_time_limit_terminates() {
        let graph = random_graph(30, 70);
        let params = AlgorithmParams::builder()
            .population_count(8)
            .max_execution_time_ms(50)
            .build()
            .unwrap();
        let mut algorithm = GeneticAlgorithm::with_timer(
            &graph,
            params,
            RandomNumberGenerator::from_seed(71),
            TickingTimer::new(1),
        )
        .unwrap();

        // Optimum of 1 is unreachable, only the clock can stop the run
        algorithm.solve_tsp().unwrap();
        let report = algorithm.report().unwrap();
        assert_eq!(report.termination, TerminationReason::TimeLimit);
        assert!(report.generations <= 51);
    }

    #[test]
    fn test_stagnation_terminates() {
        let graph = random_graph(10, 80);
        let params = AlgorithmParams::builder()
            .population_count(8)
            .max_execution_time_ms(u64::MAX)
            .max_iters_without_improvement(5)
            .build()
            .unwrap();
        let mut algorithm =
            GeneticAlgorithm::new(&graph, params, RandomNumberGenerator::from_seed(81)).unwrap();

        algorithm.solve_tsp().unwrap();
        assert_eq!(
            algorithm.report().unwrap().termination,
            TerminationReason::Stagnation
        );
    }

    #[test]
    fn test_proportional_offspring_buffer() {
        let graph = random_graph(10, 90);
        let params = AlgorithmParams::builder()
            .population_count(20)
            .crossover_probability(0.5)
            .offspring_policy(OffspringPolicy::Proportional)
            .build()
            .unwrap();
        let mut algorithm =
            GeneticAlgorithm::new(&graph, params, RandomNumberGenerator::from_seed(91)).unwrap();

        algorithm.step();
        assert_eq!(algorithm.population().len(), 20);
        assert_eq!(algorithm.next_generation().len(), 10);
        assert_consistent(algorithm.next_generation(), &graph);
    }

    #[test]
    fn test_result_before_any_generation() {
        let graph = square();
        let params = AlgorithmParams::new(100, None, 1.0, 0.0, 4).unwrap();
        let algorithm =
            GeneticAlgorithm::new(&graph, params, RandomNumberGenerator::from_seed(1)).unwrap();

        assert_eq!(algorithm.result(), Err(GeneticError::EmptyPopulation));
        assert_eq!(algorithm.termination_reason(), None);
    }

    #[test]
    fn test_same_seed_same_run() {
        let graph = random_graph(15, 100);
        let params = AlgorithmParams::builder()
            .population_count(10)
            .max_iters_without_improvement(20)
            .max_execution_time_ms(u64::MAX)
            .build()
            .unwrap();

        let mut a = GeneticAlgorithm::new(&graph, params.clone(), RandomNumberGenerator::from_seed(7))
            .unwrap();
        let mut b =
            GeneticAlgorithm::new(&graph, params, RandomNumberGenerator::from_seed(7)).unwrap();

        assert_eq!(a.solve_tsp().unwrap(), b.solve_tsp().unwrap());
        assert_eq!(a.generation(), b.generation());
    }
}
