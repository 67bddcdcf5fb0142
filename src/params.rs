//! # AlgorithmParams
//!
//! The `AlgorithmParams` struct is the immutable configuration of one solver run:
//! population sizing, operator probabilities, and the termination budgets.
//!
//! ## Example
//!
//! ```rust
//! use gatsp::params::{AcceptanceThreshold, AlgorithmParams, OffspringPolicy};
//!
//! // Positional constructor, mirroring the classic parameter list
//! let params = AlgorithmParams::new(1_000, Some(500), 0.8, 0.05, 400).unwrap();
//! assert_eq!(params.mating_pool_size(), 200);
//! assert_eq!(params.next_generation_count(), 400);
//!
//! // Fluent builder for everything else
//! let params = AlgorithmParams::builder()
//!     .population_count(100)
//!     .crossover_probability(0.5)
//!     .offspring_policy(OffspringPolicy::Proportional)
//!     .acceptance(AcceptanceThreshold::ScaledBySize)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.next_generation_count(), 50);
//! assert_eq!(params.min_error(400), Some(1.5));
//! ```
//!
//! ## Validation
//!
//! Construction fails with `GeneticError::Configuration` when the population count
//! breaks its [`PopulationRule`], when it is too small to hold two distinct parents in
//! the mating pool, or when a probability lies outside `[0, 1]`. Values are never
//! clamped.

use crate::error::{GeneticError, Result};

/// Smallest population whose mating pool still holds two distinct parents.
pub const MIN_POPULATION_COUNT: usize = 4;

/// Divisibility constraint on the population count.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopulationRule {
    /// Population count must be even, so tournament pairs cover everyone.
    #[default]
    Even,
    /// Population count must be divisible by 4, so the mating pool is even as well.
    DivisibleByFour,
}

impl PopulationRule {
    fn divisor(self) -> usize {
        match self {
            PopulationRule::Even => 2,
            PopulationRule::DivisibleByFour => 4,
        }
    }
}

/// How many offspring each generation stages before succession.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffspringPolicy {
    /// As many offspring as there are individuals in the population.
    #[default]
    MatchPopulation,
    /// `floor(population_count * crossover_probability)` offspring, rounded down to even.
    Proportional,
}

/// When a fittest individual is good enough to stop the run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AcceptanceThreshold {
    /// Stop only when the known optimum is reached exactly.
    #[default]
    OptimumOnly,
    /// Stop once the PRD is at most this many percent.
    Fixed(f64),
    /// Derive the PRD threshold from the instance size, see [`min_error_for_size`].
    ScaledBySize,
}

/// PRD acceptance threshold (in percent) for an instance with `vertex_count` vertices.
///
/// Exact convergence gets impractical as instances grow, so larger instances accept a
/// small deviation: 0.0 up to 70 vertices, 0.5 up to 350, 1.5 beyond.
pub fn min_error_for_size(vertex_count: usize) -> f64 {
    match vertex_count {
        0..=70 => 0.0,
        71..=350 => 0.5,
        _ => 1.5,
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmParams {
    max_execution_time_ms: u64,
    max_iters_without_improvement: Option<usize>,
    crossover_probability: f64,
    mutation_probability: f64,
    population_count: usize,
    population_rule: PopulationRule,
    offspring_policy: OffspringPolicy,
    acceptance: AcceptanceThreshold,
    /// Minimum offspring buffer size for which weights are refreshed in parallel
    parallel_threshold: usize,
}

impl AlgorithmParams {
    /// Creates validated parameters with the default policies.
    ///
    /// # Arguments
    ///
    /// * `max_execution_time_ms` - Wall-clock budget for the whole run.
    /// * `max_iters_without_improvement` - Optional stagnation budget in generations.
    /// * `crossover_probability` - In `[0, 1]`; sizes offspring under `OffspringPolicy::Proportional`.
    /// * `mutation_probability` - In `[0, 1]`; per individual, per generation.
    /// * `population_count` - Even, at least 4.
    pub fn new(
        max_execution_time_ms: u64,
        max_iters_without_improvement: Option<usize>,
        crossover_probability: f64,
        mutation_probability: f64,
        population_count: usize,
    ) -> Result<Self> {
        let params = Self {
            max_execution_time_ms,
            max_iters_without_improvement,
            crossover_probability,
            mutation_probability,
            population_count,
            ..Self::default()
        };
        params.validate()?;
        Ok(params)
    }

    /// Returns a builder for creating an `AlgorithmParams` instance.
    pub fn builder() -> AlgorithmParamsBuilder {
        AlgorithmParamsBuilder::default()
    }

    /// Checks every constraint on the parameters.
    ///
    /// Called by the constructors and again by the solver, so parameters that arrive
    /// through deserialization are checked too.
    pub fn validate(&self) -> Result<()> {
        let divisor = self.population_rule.divisor();
        if self.population_count % divisor != 0 {
            return Err(GeneticError::Configuration(format!(
                "Population count must be divisible by {}, got {}",
                divisor, self.population_count
            )));
        }
        if self.population_count < MIN_POPULATION_COUNT {
            return Err(GeneticError::Configuration(format!(
                "Population count must be at least {}, got {}",
                MIN_POPULATION_COUNT, self.population_count
            )));
        }
        check_probability("Crossover", self.crossover_probability)?;
        check_probability("Mutation", self.mutation_probability)?;

        if let AcceptanceThreshold::Fixed(threshold) = self.acceptance {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(GeneticError::Configuration(format!(
                    "Acceptance threshold must be a non-negative percentage, got {}",
                    threshold
                )));
            }
        }
        if self.offspring_policy == OffspringPolicy::Proportional
            && self.next_generation_count() < 2
        {
            return Err(GeneticError::Configuration(format!(
                "Crossover probability {} leaves no room for a pair of offspring in a population of {}",
                self.crossover_probability, self.population_count
            )));
        }

        Ok(())
    }

    pub fn max_execution_time_ms(&self) -> u64 {
        self.max_execution_time_ms
    }

    pub fn max_iters_without_improvement(&self) -> Option<usize> {
        self.max_iters_without_improvement
    }

    pub fn crossover_probability(&self) -> f64 {
        self.crossover_probability
    }

    pub fn mutation_probability(&self) -> f64 {
        self.mutation_probability
    }

    pub fn population_count(&self) -> usize {
        self.population_count
    }

    pub fn population_rule(&self) -> PopulationRule {
        self.population_rule
    }

    pub fn offspring_policy(&self) -> OffspringPolicy {
        self.offspring_policy
    }

    pub fn acceptance(&self) -> AcceptanceThreshold {
        self.acceptance
    }

    /// Returns the minimum offspring buffer size processed in parallel.
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Number of tournament winners, one per pair of contestants.
    pub fn mating_pool_size(&self) -> usize {
        self.population_count / 2
    }

    /// Number of offspring staged per generation.
    ///
    /// Every crossover yields two children, so the proportional count is rounded down
    /// to an even number.
    pub fn next_generation_count(&self) -> usize {
        match self.offspring_policy {
            OffspringPolicy::MatchPopulation => self.population_count,
            OffspringPolicy::Proportional => {
                let count =
                    (self.population_count as f64 * self.crossover_probability).floor() as usize;
                count - count % 2
            }
        }
    }

    /// PRD threshold in percent for an instance of `vertex_count` vertices, if any.
    pub fn min_error(&self, vertex_count: usize) -> Option<f64> {
        match self.acceptance {
            AcceptanceThreshold::OptimumOnly => None,
            AcceptanceThreshold::Fixed(threshold) => Some(threshold),
            AcceptanceThreshold::ScaledBySize => Some(min_error_for_size(vertex_count)),
        }
    }
}

fn check_probability(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GeneticError::Configuration(format!(
            "{} probability must lie in [0, 1], got {}",
            name, value
        )))
    }
}

impl Default for AlgorithmParams {
    fn default() -> Self {
        Self {
            max_execution_time_ms: 10_000,
            max_iters_without_improvement: None,
            crossover_probability: 0.8,
            mutation_probability: 0.05,
            population_count: 400,
            population_rule: PopulationRule::Even,
            offspring_policy: OffspringPolicy::MatchPopulation,
            acceptance: AcceptanceThreshold::OptimumOnly,
            parallel_threshold: 1000, // Default parallel threshold
        }
    }
}

/// Builder for `AlgorithmParams`.
///
/// Unset fields fall back to `AlgorithmParams::default()`; `build` validates.
#[derive(Debug, Clone, Default)]
pub struct AlgorithmParamsBuilder {
    max_execution_time_ms: Option<u64>,
    max_iters_without_improvement: Option<usize>,
    crossover_probability: Option<f64>,
    mutation_probability: Option<f64>,
    population_count: Option<usize>,
    population_rule: Option<PopulationRule>,
    offspring_policy: Option<OffspringPolicy>,
    acceptance: Option<AcceptanceThreshold>,
    parallel_threshold: Option<usize>,
}

impl AlgorithmParamsBuilder {
    pub fn max_execution_time_ms(mut self, value: u64) -> Self {
        self.max_execution_time_ms = Some(value);
        self
    }

    pub fn max_iters_without_improvement(mut self, value: usize) -> Self {
        self.max_iters_without_improvement = Some(value);
        self
    }

    pub fn crossover_probability(mut self, value: f64) -> Self {
        self.crossover_probability = Some(value);
        self
    }

    pub fn mutation_probability(mut self, value: f64) -> Self {
        self.mutation_probability = Some(value);
        self
    }

    pub fn population_count(mut self, value: usize) -> Self {
        self.population_count = Some(value);
        self
    }

    pub fn population_rule(mut self, value: PopulationRule) -> Self {
        self.population_rule = Some(value);
        self
    }

    pub fn offspring_policy(mut self, value: OffspringPolicy) -> Self {
        self.offspring_policy = Some(value);
        self
    }

    pub fn acceptance(mut self, value: AcceptanceThreshold) -> Self {
        self.acceptance = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    /// Builds and validates the `AlgorithmParams` instance.
    pub fn build(self) -> Result<AlgorithmParams> {
        let defaults = AlgorithmParams::default();
        let params = AlgorithmParams {
            max_execution_time_ms: self
                .max_execution_time_ms
                .unwrap_or(defaults.max_execution_time_ms),
            max_iters_without_improvement: self
                .max_iters_without_improvement
                .or(defaults.max_iters_without_improvement),
            crossover_probability: self
                .crossover_probability
                .unwrap_or(defaults.crossover_probability),
            mutation_probability: self
                .mutation_probability
                .unwrap_or(defaults.mutation_probability),
            population_count: self.population_count.unwrap_or(defaults.population_count),
            population_rule: self.population_rule.unwrap_or(defaults.population_rule),
            offspring_policy: self.offspring_policy.unwrap_or(defaults.offspring_policy),
            acceptance: self.acceptance.unwrap_or(defaults.acceptance),
            parallel_threshold: self.parallel_threshold.unwrap_or(defaults.parallel_threshold),
        };
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = AlgorithmParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.mating_pool_size(), 200);
        assert_eq!(params.next_generation_count(), 400);
        assert_eq!(params.min_error(10), None);
    }

    #[test]
    fn test_rejects_odd_population() {
        let result = AlgorithmParams::new(100, None, 0.8, 0.05, 7);
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }

    #[test]
    fn test_rejects_tiny_population() {
        assert!(AlgorithmParams::new(100, None, 0.8, 0.05, 2).is_err());
        assert!(AlgorithmParams::new(100, None, 0.8, 0.05, 0).is_err());
        assert!(AlgorithmParams::new(100, None, 0.8, 0.05, 4).is_ok());
    }

    #[test]
    fn test_divisible_by_four_rule() {
        let result = AlgorithmParams::builder()
            .population_count(10)
            .population_rule(PopulationRule::DivisibleByFour)
            .build();
        assert!(result.is_err());

        let result = AlgorithmParams::builder()
            .population_count(12)
            .population_rule(PopulationRule::DivisibleByFour)
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_rejects_probabilities_out_of_range() {
        assert!(AlgorithmParams::new(100, None, 1.2, 0.05, 8).is_err());
        assert!(AlgorithmParams::new(100, None, 0.8, -0.1, 8).is_err());
        assert!(AlgorithmParams::new(100, None, f64::NAN, 0.05, 8).is_err());
        assert!(AlgorithmParams::new(100, None, 0.0, 1.0, 8).is_ok());
    }

    #[test]
    fn test_proportional_offspring_count() {
        let params = AlgorithmParams::builder()
            .population_count(10)
            .crossover_probability(0.75)
            .offspring_policy(OffspringPolicy::Proportional)
            .build()
            .unwrap();
        // floor(7.5) = 7, rounded down to even
        assert_eq!(params.next_generation_count(), 6);

        let result = AlgorithmParams::builder()
            .population_count(4)
            .crossover_probability(0.25)
            .offspring_policy(OffspringPolicy::Proportional)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_min_error_for_size() {
        assert_eq!(min_error_for_size(1), 0.0);
        assert_eq!(min_error_for_size(70), 0.0);
        assert_eq!(min_error_for_size(71), 0.5);
        assert_eq!(min_error_for_size(350), 0.5);
        assert_eq!(min_error_for_size(351), 1.5);
    }

    #[test]
    fn test_acceptance_thresholds() {
        let fixed = AlgorithmParams::builder()
            .population_count(8)
            .acceptance(AcceptanceThreshold::Fixed(2.5))
            .build()
            .unwrap();
        assert_eq!(fixed.min_error(1000), Some(2.5));

        let scaled = AlgorithmParams::builder()
            .population_count(8)
            .acceptance(AcceptanceThreshold::ScaledBySize)
            .build()
            .unwrap();
        assert_eq!(scaled.min_error(100), Some(0.5));

        let negative = AlgorithmParams::builder()
            .population_count(8)
            .acceptance(AcceptanceThreshold::Fixed(-1.0))
            .build();
        assert!(negative.is_err());
    }

    #[test]
    fn test_builder_keeps_unset_defaults() {
        let params = AlgorithmParams::builder()
            .population_count(16)
            .max_iters_without_improvement(25)
            .build()
            .unwrap();
        assert_eq!(params.population_count(), 16);
        assert_eq!(params.max_iters_without_improvement(), Some(25));
        assert_eq!(params.mutation_probability(), 0.05);
        assert_eq!(params.parallel_threshold(), 1000);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_partial_settings() {
        let json = r#"{
            "max_execution_time_ms": 250,
            "population_count": 20,
            "acceptance": "ScaledBySize"
        }"#;
        let params: AlgorithmParams = serde_json::from_str(json).unwrap();
        assert!(params.validate().is_ok());
        assert_eq!(params.max_execution_time_ms(), 250);
        assert_eq!(params.population_count(), 20);
        assert_eq!(params.mutation_probability(), 0.05);
        assert_eq!(params.min_error(500), Some(1.5));

        let invalid: AlgorithmParams =
            serde_json::from_str(r#"{ "population_count": 9 }"#).unwrap();
        assert!(invalid.validate().is_err());
    }
}
