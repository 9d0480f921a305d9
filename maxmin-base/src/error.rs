use thiserror::Error;

pub type Result<T> = std::result::Result<T, MaxMinError>;

/// Everything that can go wrong when driving the MaxMin primitives.
///
/// None of these is fatal: they tell the caller that an operation was
/// invoked on inputs that do not belong to the configured run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MaxMinError {
    #[error("objects amount {amount} is outside of the accepted range [{min}, {max}]")]
    InvalidConfiguration { amount: usize, min: usize, max: usize },

    #[error("expected {expected} points, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("expected {expected} kernels, got {actual}")]
    KernelMismatch { expected: usize, actual: usize },

    #[error("kernel index {index} is out of range for {objects} points")]
    KernelOutOfRange { index: usize, objects: usize },

    #[error("class {class} is out of range for {classes} classes")]
    ClassOutOfRange { class: usize, classes: usize },

    #[error("degenerate state: {0}")]
    DegenerateState(String),
}
