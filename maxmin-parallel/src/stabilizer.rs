use crate::common::check_classification;
use crate::MaxMin;
use log::debug;
use maxmin_base::classification::Classification;
use maxmin_base::error::{MaxMinError, Result};
use rayon::prelude::*;

/// Outcome of one stabilization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stabilization {
    /// The kernel list after the pass. Same length and class order as the
    /// input list.
    pub kernels: Vec<usize>,
    /// Classes whose kernel was replaced by the class medoid.
    pub moved: Vec<usize>,
}

impl Stabilization {
    /// True if no kernel moved, i.e. the input kernels are already the
    /// medoids of their classes.
    pub fn is_converged(&self) -> bool {
        self.moved.is_empty()
    }
}

impl MaxMin {
    /// Replaces the kernel of each class with the medoid of the class, the
    /// member with the smallest sum of distances to the other members.
    ///
    /// This is a single pass: the classification is not updated, so the
    /// caller decides whether to classify and stabilize again. Classes are
    /// processed in parallel. A kernel only moves if the medoid differs
    /// from it by value, and then takes the first point with the medoid's
    /// coordinates. Empty classes keep their kernel.
    pub fn stabilize<P, D>(
        &self,
        classification: &Classification,
        points: &[P],
        kernels: &[usize],
        distance: &D,
    ) -> Result<Stabilization>
    where
        P: PartialEq + Sync,
        D: Fn(&P, &P) -> f64 + Sync,
    {
        self.check_points(points)?;
        if kernels.len() != self.classes_amount {
            return Err(MaxMinError::KernelMismatch {
                expected: self.classes_amount,
                actual: kernels.len(),
            });
        }
        check_classification(classification, self.objects_amount, kernels.len())?;
        self.check_kernels(kernels)?;

        let medoids: Vec<Option<usize>> = classification
            .buckets()
            .par_iter()
            .map(|members| medoid(members, points, distance))
            .collect();

        let mut stabilized = kernels.to_vec();
        let mut moved = Vec::new();
        for (class, m) in medoids.into_iter().enumerate() {
            if let Some(m) = m {
                if points[m] != points[kernels[class]] {
                    let first = points.iter().position(|p| *p == points[m]).unwrap_or(m);
                    debug!(
                        "Kernel of class {} moves from {} to {}",
                        class, kernels[class], first
                    );
                    stabilized[class] = first;
                    moved.push(class);
                }
            }
        }
        Ok(Stabilization {
            kernels: stabilized,
            moved,
        })
    }
}

/// Medoid of `members`, the first one in case of ties.
///
/// The sum of a candidate is abandoned as soon as it reaches the best sum
/// found so far: distances are non-negative, so it can only grow.
fn medoid<P, D>(members: &[usize], points: &[P], distance: &D) -> Option<usize>
where
    D: Fn(&P, &P) -> f64,
{
    let mut best = None;
    let mut best_sum = std::f64::MAX;
    for &candidate in members {
        let mut sum = 0.0;
        for &other in members {
            if sum >= best_sum {
                break;
            }
            sum += distance(&points[candidate], &points[other]);
        }
        if sum < best_sum {
            best_sum = sum;
            best = Some(candidate);
        }
    }
    best
}
