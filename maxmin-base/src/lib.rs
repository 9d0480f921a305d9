pub mod algorithm;
pub mod classification;
pub mod dataset;
pub mod error;
pub mod perf_counters;
pub mod types;

/// Smallest number of points a production run accepts.
pub const MIN_OBJECTS_AMOUNT: usize = 1000;
/// Largest number of points a production run accepts.
pub const MAX_OBJECTS_AMOUNT: usize = 100000;
