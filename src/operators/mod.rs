//! # Genetic Operators
//!
//! The transformations the generational loop is built from. Each operator works in
//! place on buffers owned by the solver and keeps every tour a valid permutation by
//! construction.
//!
//! - [`TournamentSelection`]: binary tournaments filling the mating pool.
//! - [`OrderedCrossover`]: OX, two children per pair of parents.
//! - [`InversionMutation`]: reverses a random segment of a tour.
//! - [`ElitistSuccession`]: keeps the fittest individuals of parents and offspring.
pub mod crossover;
pub mod cut;
pub mod mutation;
pub mod selection;
pub mod succession;

pub use crossover::OrderedCrossover;
pub use cut::CutPoints;
pub use mutation::InversionMutation;
pub use selection::TournamentSelection;
pub use succession::ElitistSuccession;
