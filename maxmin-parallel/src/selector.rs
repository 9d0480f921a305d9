use crate::MaxMin;
use log::debug;
use maxmin_base::error::{MaxMinError, Result};
use rand::Rng;

impl MaxMin {
    /// Picks the two kernels the run starts from: a random point, and the
    /// point farthest from it.
    ///
    /// Among points at the same maximal distance the first one in point
    /// order is taken. Sets the number of classes to two.
    pub fn choose_initial_kernels<P, D>(&mut self, points: &[P], distance: &D) -> Result<Vec<usize>>
    where
        D: Fn(&P, &P) -> f64,
    {
        self.check_points(points)?;

        let first = self.rng.gen_range(0..points.len());
        let mut farthest = 0;
        let mut farthest_dist = 0.0;
        for (i, p) in points.iter().enumerate() {
            let d = distance(p, &points[first]);
            if d > farthest_dist {
                farthest_dist = d;
                farthest = i;
            }
        }
        if farthest_dist == 0.0 {
            return Err(MaxMinError::DegenerateState(format!(
                "all points coincide with point {}",
                first
            )));
        }

        debug!(
            "Initial kernels {} and {} at distance {}",
            first, farthest, farthest_dist
        );
        self.classes_amount = 2;
        Ok(vec![first, farthest])
    }
}

#[cfg(test)]
mod tests {
    use crate::common::test_util::*;
    use crate::{Limits, MaxMin};
    use maxmin_base::error::MaxMinError;
    use maxmin_base::types::Point2D;

    fn corners() -> Vec<Point2D> {
        points(&[(0.0, 0.0), (0.0, 1.0), (10.0, 0.0), (10.0, 1.0)])
    }

    #[test]
    fn picks_the_farthest_point_from_the_random_one() {
        let points = corners();
        for seed in 0..32 {
            let mut maxmin = MaxMin::with_limits(4, Limits::relaxed())
                .unwrap()
                .with_seed(seed);
            let kernels = maxmin.choose_initial_kernels(&points, &euclidean).unwrap();
            assert_eq!(kernels.len(), 2);
            let expected = match kernels[0] {
                0 => 3,
                1 => 2,
                2 => 1,
                3 => 0,
                _ => unreachable!(),
            };
            assert_eq!(kernels[1], expected);
            assert_eq!(maxmin.classes_amount(), 2);
        }
    }

    #[test]
    fn ties_go_to_the_first_point() {
        // Points 1 and 2 are both at distance 1 from point 0.
        let points = points(&[(0.0, 0.0), (1.0, 0.0), (-1.0, 0.0)]);
        for seed in 0..32 {
            let mut maxmin = MaxMin::with_limits(3, Limits::relaxed())
                .unwrap()
                .with_seed(seed);
            let kernels = maxmin.choose_initial_kernels(&points, &euclidean).unwrap();
            if kernels[0] == 0 {
                assert_eq!(kernels[1], 1);
            }
        }
    }

    #[test]
    fn same_seed_same_kernels() {
        let points = maxmin_base::dataset::random_points(1000, 300, 300, 5).unwrap();
        let choose = |seed| {
            MaxMin::new(1000)
                .unwrap()
                .with_seed(seed)
                .choose_initial_kernels(&points, &euclidean)
                .unwrap()
        };
        assert_eq!(choose(99), choose(99));
        let kernels = choose(3);
        assert_ne!(kernels[0], kernels[1]);
        assert!(kernels.iter().all(|&k| k < points.len()));
    }

    #[test]
    fn wrong_number_of_points() {
        let mut maxmin = MaxMin::with_limits(5, Limits::relaxed()).unwrap();
        assert_eq!(
            maxmin.choose_initial_kernels(&corners(), &euclidean),
            Err(MaxMinError::ShapeMismatch {
                expected: 5,
                actual: 4
            })
        );
        assert_eq!(maxmin.classes_amount(), 0);
    }

    #[test]
    fn coinciding_points() {
        let points = points(&[(2.0, 2.0); 3]);
        let mut maxmin = MaxMin::with_limits(3, Limits::relaxed()).unwrap();
        assert!(matches!(
            maxmin.choose_initial_kernels(&points, &euclidean),
            Err(MaxMinError::DegenerateState(_))
        ));
    }
}
