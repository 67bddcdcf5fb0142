pub mod algorithm;
pub mod error;
pub mod graph;
pub mod individual;
pub mod operators;
pub mod params;
pub mod rng;
pub mod timer;

// Re-export commonly used types for convenience
pub use algorithm::{GeneticAlgorithm, Path, RunReport, TerminationReason};
pub use error::{GeneticError, OptionExt, Result};
pub use graph::{Graph, GraphMatrix};
pub use individual::Individual;
pub use params::AlgorithmParams;
pub use rng::RandomNumberGenerator;
pub use timer::{Stopwatch, Timer};
