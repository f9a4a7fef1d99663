pub mod accumulator;
pub mod announce;
pub mod counter;
pub mod error;
pub mod regime;
pub mod tracing_setup;

pub use accumulator::{run, RunOutcome};
pub use error::AccumulatorError;
pub use regime::Regime;

/// Number of worker threads each lesson binary starts.
pub const DEFAULT_THREADS: usize = 2;
/// Increments every worker performs in the lesson binaries.
pub const DEFAULT_ITERATIONS_PER_THREAD: usize = 1_000_000;
