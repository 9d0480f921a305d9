use crate::common::{average_pairwise_distance, check_classification};
use crate::MaxMin;
use log::debug;
use maxmin_base::classification::Classification;
use maxmin_base::error::Result;
use maxmin_base::perf_counters;
use rayon::prelude::*;

/// Outcome of a growth attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Growth {
    /// A new kernel was promoted. `kernels` is the old kernel list with
    /// `new_kernel` appended; the points have to be classified again.
    Grown {
        kernels: Vec<usize>,
        new_kernel: usize,
        distance: f64,
    },
    /// No point is far enough from its kernel: the kernel set is final.
    Stable,
}

impl Growth {
    pub fn is_stable(&self) -> bool {
        matches!(self, Growth::Stable)
    }
}

impl MaxMin {
    /// Looks for the point farthest from the kernel of its class, across
    /// all classes, and promotes it to a new kernel if its distance exceeds
    /// half the average distance between the current kernels.
    ///
    /// The farthest point of each class is searched in parallel, one task
    /// per class. Ties are resolved in favor of the first point of a class,
    /// and of the first class.
    pub fn try_grow<P, D>(
        &mut self,
        classification: &Classification,
        points: &[P],
        kernels: &[usize],
        distance: &D,
    ) -> Result<Growth>
    where
        P: Sync,
        D: Fn(&P, &P) -> f64 + Sync,
    {
        self.check_points(points)?;
        check_classification(classification, self.objects_amount, kernels.len())?;
        self.check_kernels(kernels)?;
        self.classes_amount = kernels.len();

        let remote: Vec<Option<(usize, f64)>> = classification
            .buckets()
            .par_iter()
            .zip(kernels.par_iter())
            .map(|(members, &kernel)| most_remote(members, &points[kernel], points, distance))
            .collect();

        let mut farthest: Option<(usize, usize)> = None;
        let mut farthest_dist = 0.0;
        for (class, r) in remote.iter().enumerate() {
            if let Some((point, d)) = *r {
                if d > farthest_dist {
                    farthest_dist = d;
                    farthest = Some((class, point));
                }
            }
        }

        let average = average_pairwise_distance(points, kernels, distance)?;
        debug!(
            "Farthest point {:?} at distance {}, average kernel distance {}",
            farthest, farthest_dist, average
        );

        match farthest {
            Some((class, point)) if farthest_dist > average / 2.0 => {
                self.classes_amount += 1;
                perf_counters::inc_growth_count();
                debug!(
                    "Point {} leaves class {} and becomes kernel of class {}",
                    point, class, kernels.len()
                );
                let mut grown = Vec::with_capacity(kernels.len() + 1);
                grown.extend_from_slice(kernels);
                grown.push(point);
                Ok(Growth::Grown {
                    kernels: grown,
                    new_kernel: point,
                    distance: farthest_dist,
                })
            }
            _ => Ok(Growth::Stable),
        }
    }
}

/// The member farthest from `kernel`, with its distance. Members at
/// distance zero never qualify, so an empty class, or one whose points all
/// coincide with the kernel, yields `None`.
fn most_remote<P, D>(
    members: &[usize],
    kernel: &P,
    points: &[P],
    distance: &D,
) -> Option<(usize, f64)>
where
    D: Fn(&P, &P) -> f64,
{
    let mut remote = None;
    let mut max_dist = 0.0;
    for &i in members {
        let d = distance(kernel, &points[i]);
        if d > max_dist {
            max_dist = d;
            remote = Some((i, d));
        }
    }
    remote
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_util::*;
    use crate::Limits;
    use maxmin_base::dataset::random_points;
    use maxmin_base::error::MaxMinError;

    #[test]
    fn most_remote_prefers_the_first_point() {
        let points = points(&[(0.0, 0.0), (0.0, 3.0), (3.0, 0.0), (1.0, 1.0)]);
        assert_eq!(
            most_remote(&[0, 1, 2, 3], &points[0], &points, &euclidean),
            Some((1, 3.0))
        );
        assert_eq!(
            most_remote(&[2, 1], &points[0], &points, &euclidean),
            Some((2, 3.0))
        );
        assert_eq!(most_remote(&[], &points[0], &points, &euclidean), None);
        assert_eq!(most_remote(&[0], &points[0], &points, &euclidean), None);
    }

    #[test]
    fn grows_a_third_class() {
        // Two tight groups and a far away third one.
        let points = points(&[
            (0.0, 0.0),
            (0.0, 1.0),
            (10.0, 0.0),
            (10.0, 1.0),
            (5.0, 20.0),
            (5.0, 21.0),
        ]);
        let mut maxmin = MaxMin::with_limits(6, Limits::relaxed()).unwrap();
        let kernels = vec![0, 2];
        let classification = maxmin.classify(&points, &kernels, &euclidean).unwrap();
        let growth = maxmin
            .try_grow(&classification, &points, &kernels, &euclidean)
            .unwrap();
        match growth {
            Growth::Grown {
                kernels: grown,
                new_kernel,
                ..
            } => {
                assert_eq!(grown[..2], kernels[..]);
                assert_eq!(new_kernel, 5);
                assert_eq!(grown, vec![0, 2, 5]);
            }
            Growth::Stable => panic!("expected a new kernel"),
        }
        assert_eq!(maxmin.classes_amount(), 3);
    }

    #[test]
    fn well_separated_classes_are_stable() {
        let points = points(&[(0.0, 0.0), (0.0, 1.0), (10.0, 0.0), (10.0, 1.0)]);
        let mut maxmin = MaxMin::with_limits(4, Limits::relaxed()).unwrap();
        let kernels = vec![0, 2];
        let classification = maxmin.classify(&points, &kernels, &euclidean).unwrap();
        let growth = maxmin
            .try_grow(&classification, &points, &kernels, &euclidean)
            .unwrap();
        assert!(growth.is_stable());
        assert_eq!(maxmin.classes_amount(), 2);
    }

    #[test]
    fn empty_classes_do_not_contribute() {
        // Kernel 2 coincides with kernel 0's coordinates, so its class stays
        // empty: point 2 always goes to the first of the two.
        let points = points(&[(0.0, 0.0), (10.0, 0.0), (0.0, 0.0), (10.0, 9.0)]);
        let mut maxmin = MaxMin::with_limits(4, Limits::relaxed()).unwrap();
        let kernels = vec![0, 1, 2];
        let classification = maxmin.classify(&points, &kernels, &euclidean).unwrap();
        assert_eq!(classification.class_sizes(), vec![2, 2, 0]);
        // average kernel distance is (10 + 0 + 10) / 3, the farthest point is
        // 9 away from kernel 1
        let growth = maxmin
            .try_grow(&classification, &points, &kernels, &euclidean)
            .unwrap();
        assert_eq!(
            growth,
            Growth::Grown {
                kernels: vec![0, 1, 2, 3],
                new_kernel: 3,
                distance: 9.0
            }
        );
    }

    #[test]
    fn growth_terminates_and_adds_fresh_kernels() {
        let points = random_points(2000, 800, 600, 11).unwrap();
        let mut maxmin = MaxMin::new(points.len()).unwrap().with_seed(1);
        let mut kernels = maxmin.choose_initial_kernels(&points, &euclidean).unwrap();
        let mut classification = maxmin.classify(&points, &kernels, &euclidean).unwrap();
        let mut steps = 0;
        while let Growth::Grown {
            kernels: grown,
            new_kernel,
            ..
        } = maxmin
            .try_grow(&classification, &points, &kernels, &euclidean)
            .unwrap()
        {
            assert_eq!(grown.len(), kernels.len() + 1);
            assert!(!kernels.contains(&new_kernel));
            assert_eq!(*grown.last().unwrap(), new_kernel);
            assert_eq!(maxmin.classes_amount(), grown.len());
            kernels = grown;
            classification = maxmin.classify(&points, &kernels, &euclidean).unwrap();
            steps += 1;
            assert!(steps < points.len(), "growth does not terminate");
        }
        assert_eq!(maxmin.classes_amount(), kernels.len());
        assert!(kernels.len() >= 2);
    }

    #[test]
    fn rejects_stale_classification() {
        let points = points(&[(0.0, 0.0), (0.0, 1.0), (10.0, 0.0), (10.0, 1.0)]);
        let mut maxmin = MaxMin::with_limits(4, Limits::relaxed()).unwrap();
        let classification = maxmin.classify(&points, &[0, 2], &euclidean).unwrap();
        assert_eq!(
            maxmin.try_grow(&classification, &points, &[0, 2, 3], &euclidean),
            Err(MaxMinError::KernelMismatch {
                expected: 2,
                actual: 3
            })
        );
        // A class index past the last kernel is an error, not a panic.
        let out_of_range = Classification::new(vec![0, 0, 5, 1], 2);
        assert_eq!(
            maxmin.try_grow(&out_of_range, &points, &[0, 2], &euclidean),
            Err(MaxMinError::ClassOutOfRange {
                class: 5,
                classes: 2
            })
        );
        let single = maxmin.classify(&points, &[0], &euclidean).unwrap();
        assert!(matches!(
            maxmin.try_grow(&single, &points, &[0], &euclidean),
            Err(MaxMinError::DegenerateState(_))
        ));
    }
}
