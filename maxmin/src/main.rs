mod configuration;
mod driver;
mod reporter;

use anyhow::{Context, Result};
use configuration::*;
use driver::MaxMinDriver;
use log::{debug, info};
use maxmin_base::types::{Distance, Point2D};
use reporter::Reporter;
use std::time::Instant;

fn euclidean(a: &Point2D, b: &Point2D) -> f64 {
    a.distance(b)
}

fn run(config: &Configuration) -> Result<()> {
    debug!("Configuration {:?}, replay with {}", config, config.encode()?);
    let mut reporter = Reporter::from_config(config.clone());

    let start = Instant::now();
    let points = config.points()?;
    info!("loaded {} points in {:?}", points.len(), start.elapsed());

    let mut driver = MaxMinDriver::new(
        config.objects,
        config.seed,
        config.limits(),
        config.stabilization.clone(),
    );
    let timer = Instant::now();
    let outcome = match &config.parallel {
        Some(parallel) => {
            let pool = parallel.pool()?;
            info!("Running on {} threads", pool.current_num_threads());
            pool.install(|| driver.run(&points, &euclidean))
        }
        None => driver.run(&points, &euclidean),
    }?;
    let elapsed = timer.elapsed();

    info!(
        "Found {} classes in {:?} ({} growth steps, {} stabilization passes)",
        outcome.kernels.len(),
        elapsed,
        outcome.growth_steps,
        outcome.stabilization_passes
    );

    reporter.set_outcome(elapsed, &outcome, &points)?;
    reporter.set_algorithm(&driver);
    reporter.save()?;

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let config_spec = std::env::args()
        .nth(1)
        .context("provide the specification of the configuration, either a file path or a json object encoded as base64")?;
    let config = Configuration::load(config_spec)?;

    run(&config)
}
