use maxmin_base::classification::Classification;
use maxmin_base::error::{MaxMinError, Result};

/// Average distance over all unordered pairs of kernels.
pub(crate) fn average_pairwise_distance<P, D>(
    points: &[P],
    kernels: &[usize],
    distance: &D,
) -> Result<f64>
where
    D: Fn(&P, &P) -> f64,
{
    if kernels.len() < 2 {
        return Err(MaxMinError::DegenerateState(format!(
            "average kernel distance needs at least two kernels, got {}",
            kernels.len()
        )));
    }
    let mut sum = 0.0;
    let mut pairs = 0usize;
    for (i, &a) in kernels.iter().enumerate() {
        for &b in &kernels[i + 1..] {
            sum += distance(&points[a], &points[b]);
            pairs += 1;
        }
    }
    Ok(sum / pairs as f64)
}

/// Checks that `classification` was computed over `objects` points with
/// `kernels` kernels, and that every point belongs to one of them.
pub(crate) fn check_classification(
    classification: &Classification,
    objects: usize,
    kernels: usize,
) -> Result<()> {
    if classification.len() != objects {
        return Err(MaxMinError::ShapeMismatch {
            expected: objects,
            actual: classification.len(),
        });
    }
    if classification.num_classes() != kernels {
        return Err(MaxMinError::KernelMismatch {
            expected: classification.num_classes(),
            actual: kernels,
        });
    }
    if let Some(&class) = classification.as_slice().iter().find(|&&c| c >= kernels) {
        return Err(MaxMinError::ClassOutOfRange {
            class,
            classes: kernels,
        });
    }
    Ok(())
}
