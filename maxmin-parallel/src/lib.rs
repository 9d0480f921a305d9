//! Parallel building blocks of the MaxMin clustering heuristic.
//!
//! The heuristic starts from two kernels far apart from each other, assigns
//! every point to its closest kernel, and keeps promoting the point that
//! lies farthest from its own kernel to a new kernel, as long as that point
//! is farther than half the average distance between kernels. Once the
//! kernel set stops growing, every kernel is replaced by the medoid of its
//! class.
//!
//! [MaxMin] only provides the steps. Driving them is up to the caller:
//!
//! ```ignore
//! let mut maxmin = MaxMin::new(points.len())?;
//! let mut kernels = maxmin.choose_initial_kernels(&points, &distance)?;
//! let mut classification = maxmin.classify(&points, &kernels, &distance)?;
//! while let Growth::Grown { kernels: grown, .. } =
//!     maxmin.try_grow(&classification, &points, &kernels, &distance)?
//! {
//!     kernels = grown;
//!     classification = maxmin.classify(&points, &kernels, &distance)?;
//! }
//! let stabilization = maxmin.stabilize(&classification, &points, &kernels, &distance)?;
//! ```
use maxmin_base::error::{MaxMinError, Result};
use maxmin_base::{MAX_OBJECTS_AMOUNT, MIN_OBJECTS_AMOUNT};
use rand::prelude::*;
use rand_xorshift::XorShiftRng;

pub mod classifier;
mod common;
pub mod growth;
pub mod selector;
pub mod stabilizer;

pub use growth::Growth;
pub use stabilizer::Stabilization;

/// Accepted range for the number of points of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min: usize,
    pub max: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min: MIN_OBJECTS_AMOUNT,
            max: MAX_OBJECTS_AMOUNT,
        }
    }
}

impl Limits {
    /// Anything with at least two points, the minimum to pick two kernels.
    pub fn relaxed() -> Self {
        Self {
            min: 2,
            max: usize::MAX,
        }
    }

    /// Picking two kernels needs two points, whatever the lower limit says.
    fn effective_min(&self) -> usize {
        std::cmp::max(self.min, 2)
    }

    fn contain(&self, amount: usize) -> bool {
        self.effective_min() <= amount && amount <= self.max
    }
}

/// State of one MaxMin run: the number of points it was configured for,
/// the current number of classes, and the random source used to pick the
/// first kernel.
pub struct MaxMin {
    objects_amount: usize,
    classes_amount: usize,
    rng: XorShiftRng,
}

impl MaxMin {
    pub fn new(objects_amount: usize) -> Result<Self> {
        Self::with_limits(objects_amount, Limits::default())
    }

    pub fn with_limits(objects_amount: usize, limits: Limits) -> Result<Self> {
        if !limits.contain(objects_amount) {
            return Err(MaxMinError::InvalidConfiguration {
                amount: objects_amount,
                min: limits.effective_min(),
                max: limits.max,
            });
        }
        Ok(Self {
            objects_amount,
            classes_amount: 0,
            rng: XorShiftRng::from_entropy(),
        })
    }

    /// Makes the choice of the first kernel reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: XorShiftRng::seed_from_u64(seed),
            ..self
        }
    }

    pub fn objects_amount(&self) -> usize {
        self.objects_amount
    }

    /// Number of classes as of the last kernel selection or growth step.
    pub fn classes_amount(&self) -> usize {
        self.classes_amount
    }

    fn check_points<P>(&self, points: &[P]) -> Result<()> {
        if points.len() != self.objects_amount {
            return Err(MaxMinError::ShapeMismatch {
                expected: self.objects_amount,
                actual: points.len(),
            });
        }
        Ok(())
    }

    fn check_kernels(&self, kernels: &[usize]) -> Result<()> {
        for (i, &k) in kernels.iter().enumerate() {
            if k >= self.objects_amount {
                return Err(MaxMinError::KernelOutOfRange {
                    index: k,
                    objects: self.objects_amount,
                });
            }
            if kernels[..i].contains(&k) {
                return Err(MaxMinError::DegenerateState(format!(
                    "point {} is the kernel of more than one class",
                    k
                )));
            }
        }
        Ok(())
    }
}
