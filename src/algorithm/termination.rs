use crate::params::AlgorithmParams;

use super::path::prd;

/// Why a run stopped.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The wall-clock budget ran out.
    TimeLimit,
    /// The fittest tour weighs exactly the known optimum.
    OptimumReached,
    /// The fittest tour's PRD dropped to the acceptance threshold.
    ThresholdReached,
    /// Too many generations passed without improving the fittest tour.
    Stagnation,
}

/// Decides after every generation whether the run should stop.
///
/// Conditions are checked in a fixed order: no fittest yet means the run continues;
/// then the time budget; then the optimum, then the acceptance threshold; finally the
/// stagnation budget.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminationPolicy {
    max_execution_time_ms: u64,
    optimum: u64,
    min_error: Option<f64>,
    max_iters_without_improvement: Option<usize>,
}

impl TerminationPolicy {
    pub fn new(params: &AlgorithmParams, vertex_count: usize, optimum: u64) -> Self {
        Self {
            max_execution_time_ms: params.max_execution_time_ms(),
            optimum,
            min_error: params.min_error(vertex_count),
            max_iters_without_improvement: params.max_iters_without_improvement(),
        }
    }

    /// PRD threshold in effect, if any.
    pub fn min_error(&self) -> Option<f64> {
        self.min_error
    }

    /// Returns the reason to stop, or `None` to keep going.
    pub fn check(
        &self,
        fittest_weight: Option<u64>,
        elapsed_ms: u64,
        iters_without_improvement: usize,
    ) -> Option<TerminationReason> {
        let weight = fittest_weight?;

        if elapsed_ms > self.max_execution_time_ms {
            return Some(TerminationReason::TimeLimit);
        }
        if weight == self.optimum {
            return Some(TerminationReason::OptimumReached);
        }
        if let Some(min_error) = self.min_error {
            if prd(weight, self.optimum) <= min_error {
                return Some(TerminationReason::ThresholdReached);
            }
        }
        match self.max_iters_without_improvement {
            Some(limit) if iters_without_improvement >= limit => {
                Some(TerminationReason::Stagnation)
            }
            _ => None,
        }
    }
}
