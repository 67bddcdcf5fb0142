//! # Error Types
//!
//! This module defines the error type shared by the whole crate. Every fallible
//! operation returns [`Result`], whose error side is [`GeneticError`].
//!
//! Failures in this crate are about malformed input: algorithm parameters that
//! break their constraints, graphs that are not complete symmetric matrices, or
//! tours that are not permutations. The evolutionary loop itself performs no I/O.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use gatsp::error::{GeneticError, Result};
//!
//! fn check_population(count: usize) -> Result<()> {
//!     if count % 2 == 1 {
//!         return Err(GeneticError::Configuration(
//!             "Population count must be even".to_string(),
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_population(4).is_ok());
//! assert!(check_population(5).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use gatsp::error::{GeneticError, OptionExt};
//!
//! fn lightest(weights: &[u64]) -> gatsp::error::Result<u64> {
//!     weights.iter().min().cloned().ok_or_else_genetic(||
//!         GeneticError::EmptyPopulation
//!     )
//! }
//!
//! assert_eq!(lightest(&[7, 3, 9]).unwrap(), 3);
//! assert!(lightest(&[]).is_err());
//! ```

use thiserror::Error;

/// Represents errors that can occur while configuring or running the solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneticError {
    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when a graph is not a complete symmetric weight matrix.
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// Error that occurs when a tour is not a permutation of the graph's vertices.
    #[error("Invalid permutation: {0}")]
    InvalidPermutation(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,
}

/// A specialized Result type for solver operations.
///
/// This type is a convenience wrapper around `std::result::Result` with the error type
/// fixed to `GeneticError`.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using
    /// a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
