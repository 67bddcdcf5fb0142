//! # Timer
//!
//! Wall-clock budget tracking for a solver run. The solver only needs to start a
//! measurement and ask how many milliseconds have passed since; `Stopwatch` does this
//! with `std::time::Instant`, and tests can plug in their own `Timer`.

use std::time::Instant;

/// A restartable, monotonic millisecond clock.
pub trait Timer {
    /// Starts (or restarts) the measurement.
    fn start(&mut self);

    /// Milliseconds elapsed since the most recent `start`. Zero if never started.
    fn elapsed_ms(&self) -> u64;
}

/// `Timer` backed by `std::time::Instant`.
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    started: Option<Instant>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Timer for Stopwatch {
    fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    fn elapsed_ms(&self) -> u64 {
        self.started
            .map(|started| started.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }
}
