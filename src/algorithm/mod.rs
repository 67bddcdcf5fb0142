pub mod genetic;
pub mod path;
pub mod termination;

pub use genetic::{GeneticAlgorithm, RunReport};
pub use path::{prd, relative_error, Path};
pub use termination::{TerminationPolicy, TerminationReason};
