use crate::MaxMin;
use maxmin_base::classification::Classification;
use maxmin_base::error::{MaxMinError, Result};
use rayon::prelude::*;

/// Below this many points per task, splitting further does not pay off.
const MIN_POINTS_PER_TASK: usize = 512;

impl MaxMin {
    /// Assigns each point to the class of its closest kernel.
    ///
    /// The points are classified in parallel, in chunks, on the current
    /// rayon pool; the call returns once every point has a class. When two
    /// kernels are equally close the one that comes first in `kernels`
    /// wins.
    pub fn classify<P, D>(
        &self,
        points: &[P],
        kernels: &[usize],
        distance: &D,
    ) -> Result<Classification>
    where
        P: Sync,
        D: Fn(&P, &P) -> f64 + Sync,
    {
        self.check_points(points)?;
        if kernels.is_empty() {
            return Err(MaxMinError::DegenerateState(
                "cannot classify without kernels".to_owned(),
            ));
        }
        self.check_kernels(kernels)?;

        let class_of: Vec<usize> = points
            .par_iter()
            .with_min_len(MIN_POINTS_PER_TASK)
            .map(|p| closest_kernel(p, points, kernels, distance))
            .collect();
        Ok(Classification::new(class_of, kernels.len()))
    }
}

fn closest_kernel<P, D>(point: &P, points: &[P], kernels: &[usize], distance: &D) -> usize
where
    D: Fn(&P, &P) -> f64,
{
    let mut min_dist = std::f64::MAX;
    let mut class = 0;
    for (j, &k) in kernels.iter().enumerate() {
        let d = distance(point, &points[k]);
        if d < min_dist {
            min_dist = d;
            class = j;
        }
    }
    class
}
