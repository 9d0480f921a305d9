use crate::configuration::StabilizationConfig;
use anyhow::{Context, Result};
use log::{debug, info};
use maxmin_base::{
    algorithm::Algorithm,
    classification::{Classification, Snapshot},
    perf_counters,
};
use maxmin_parallel::{Growth, Limits, MaxMin};
use std::time::{Duration, Instant};

/// Result of a complete run.
pub struct Outcome {
    pub kernels: Vec<usize>,
    pub classification: Classification,
    /// The state of the run after the initial classification, after each
    /// growth step and after each stabilization pass that moved a kernel.
    pub snapshots: Vec<Snapshot>,
    pub growth_steps: usize,
    pub stabilization_passes: usize,
    /// Whether the last stabilization pass left every kernel in place.
    pub converged: bool,
}

/// Drives the MaxMin steps: choose two kernels, grow the kernel set
/// re-classifying after each new kernel, then stabilize.
pub struct MaxMinDriver {
    objects: usize,
    seed: u64,
    limits: Limits,
    stabilization: StabilizationConfig,
    profile: Option<(Duration, Duration)>,
    counters: Option<(u64, u64)>,
}

impl MaxMinDriver {
    pub fn new(
        objects: usize,
        seed: u64,
        limits: Limits,
        stabilization: StabilizationConfig,
    ) -> Self {
        Self {
            objects,
            seed,
            limits,
            stabilization,
            profile: None,
            counters: None,
        }
    }

    pub fn run<P, D>(&mut self, points: &[P], distance: &D) -> Result<Outcome>
    where
        P: PartialEq + Sync,
        D: Fn(&P, &P) -> f64 + Sync,
    {
        let distance = perf_counters::counting::<P, _>(distance);
        let mut maxmin = MaxMin::with_limits(self.objects, self.limits)
            .context("configuring the run")?
            .with_seed(self.seed);

        let start = Instant::now();
        let mut kernels = maxmin
            .choose_initial_kernels(points, &distance)
            .context("choosing the initial kernels")?;
        let mut classification = maxmin.classify(points, &kernels, &distance)?;
        let mut snapshots = vec![classification.snapshot(&kernels)];
        info!("Initial kernels {:?}", kernels);

        let mut growth_steps = 0;
        while let Growth::Grown {
            kernels: grown,
            new_kernel,
            distance: remoteness,
        } = maxmin
            .try_grow(&classification, points, &kernels, &distance)
            .context("growing the kernel set")?
        {
            kernels = grown;
            classification = maxmin.classify(points, &kernels, &distance)?;
            growth_steps += 1;
            let snapshot = classification.snapshot(&kernels);
            info!(
                "{} classes: new kernel {} at distance {}",
                kernels.len(),
                new_kernel,
                remoteness
            );
            debug!("Class sizes {:?}", snapshot.class_sizes);
            snapshots.push(snapshot);
        }
        let elapsed_growth = start.elapsed();

        let start = Instant::now();
        let mut stabilization_passes = 0;
        let mut converged = false;
        while !converged && stabilization_passes < self.stabilization.max_passes() {
            let stabilization = maxmin
                .stabilize(&classification, points, &kernels, &distance)
                .context("stabilizing the kernels")?;
            stabilization_passes += 1;
            converged = stabilization.is_converged();
            info!(
                "Stabilization pass {}: {} kernels moved",
                stabilization_passes,
                stabilization.moved.len()
            );
            if !converged {
                kernels = stabilization.kernels;
                classification = maxmin.classify(points, &kernels, &distance)?;
                snapshots.push(classification.snapshot(&kernels));
            }
        }
        let elapsed_stabilization = start.elapsed();

        self.profile
            .replace((elapsed_growth, elapsed_stabilization));
        self.counters.replace((
            perf_counters::distance_count(),
            perf_counters::growth_count(),
        ));

        Ok(Outcome {
            kernels,
            classification,
            snapshots,
            growth_steps,
            stabilization_passes,
            converged,
        })
    }
}

impl Algorithm for MaxMinDriver {
    fn version(&self) -> u32 {
        1
    }

    fn name(&self) -> String {
        String::from("MaxMin")
    }

    fn parameters(&self) -> String {
        format!(
            r#"{{ "seed": {}, "stabilization": "{}" }}"#,
            self.seed,
            self.stabilization.describe()
        )
    }

    fn time_profile(&self) -> (Duration, Duration) {
        self.profile.unwrap_or_default()
    }

    fn counters(&self) -> (u64, u64) {
        self.counters.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maxmin_base::dataset::random_points;
    use maxmin_base::types::{Distance, Point2D};

    fn euclidean(a: &Point2D, b: &Point2D) -> f64 {
        a.distance(b)
    }

    #[test]
    fn two_groups() {
        let points: Vec<Point2D> = vec![(0.0, 0.0), (0.0, 1.0), (10.0, 0.0), (10.0, 1.0)]
            .into_iter()
            .map(Point2D::from)
            .collect();
        let mut driver = MaxMinDriver::new(4, 0, Limits::relaxed(), StabilizationConfig::Once);
        let outcome = driver.run(&points, &euclidean).unwrap();
        assert_eq!(outcome.kernels.len(), 2);
        assert_eq!(outcome.growth_steps, 0);
        let c = &outcome.classification;
        assert_eq!(c.class_of(0), c.class_of(1));
        assert_eq!(c.class_of(2), c.class_of(3));
        assert_ne!(c.class_of(0), c.class_of(2));
        assert_eq!(outcome.stabilization_passes, 1);
    }

    #[test]
    fn same_seed_same_run() {
        let points = random_points(1200, 500, 500, 2).unwrap();
        let run = || {
            let mut driver = MaxMinDriver::new(
                points.len(),
                77,
                Limits::default(),
                StabilizationConfig::Once,
            );
            driver.run(&points, &euclidean).unwrap()
        };
        let a = run();
        let b = run();
        assert_eq!(a.kernels, b.kernels);
        assert_eq!(a.classification, b.classification);
        assert_eq!(a.snapshots, b.snapshots);
        assert_eq!(a.growth_steps + 2, a.snapshots[a.growth_steps].kernels.len());
    }

    #[test]
    fn stabilize_until_converged() {
        let points = random_points(1000, 300, 200, 9).unwrap();
        let mut driver = MaxMinDriver::new(
            points.len(),
            5,
            Limits::default(),
            StabilizationConfig::UntilConverged { max_passes: 50 },
        );
        let outcome = driver.run(&points, &euclidean).unwrap();
        assert!(outcome.converged || outcome.stabilization_passes == 50);
        assert!(outcome.stabilization_passes >= 1);
        assert_eq!(outcome.classification.num_classes(), outcome.kernels.len());
        let (growth, stabilization) = driver.time_profile();
        assert!(growth + stabilization > Duration::from_secs(0));
    }

    #[test]
    fn wrong_objects_amount() {
        let points = random_points(1000, 300, 200, 9).unwrap();
        let mut driver =
            MaxMinDriver::new(999, 5, Limits::default(), StabilizationConfig::Once);
        assert!(driver.run(&points, &euclidean).is_err());
        let mut driver =
            MaxMinDriver::new(1001, 5, Limits::default(), StabilizationConfig::Once);
        assert!(driver.run(&points, &euclidean).is_err());
    }
}
