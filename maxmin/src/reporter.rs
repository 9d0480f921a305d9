use crate::configuration::{Configuration, Sha};
use crate::driver::Outcome;
use anyhow::{Context, Result};
use chrono::prelude::*;
use log::info;
use maxmin_base::{algorithm::Algorithm, classification::Snapshot};
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct Kernel {
    index: usize,
    point: serde_json::Value,
    size: usize,
}

struct RunInfo {
    total_time: Duration,
    kernels: Vec<Kernel>,
    growth_steps: usize,
    stabilization_passes: usize,
    converged: bool,
    snapshots: Vec<Snapshot>,
}

struct AlgorithmInfo {
    name: String,
    version: u32,
    parameters: String,
}

struct Counters {
    pub distance: u64,
    pub growth: u64,
}

#[derive(Serialize)]
struct Report<'a> {
    code_version: &'a str,
    date: String,
    params_sha: String,
    algorithm: &'a str,
    algorithm_version: u32,
    algorithm_params: &'a str,
    stabilization: String,
    objects: usize,
    threads: Option<usize>,
    classes: usize,
    kernels: &'a [Kernel],
    growth_steps: usize,
    stabilization_passes: usize,
    converged: bool,
    total_time_ms: u64,
    growth_time_ms: u64,
    stabilization_time_ms: u64,
    distance_cnt: u64,
    growth_cnt: u64,
    snapshots: &'a [Snapshot],
}

pub struct Reporter {
    date: DateTime<Utc>,
    config: Configuration,
    algorithm: Option<AlgorithmInfo>,
    outcome: Option<RunInfo>,
    counters: Option<Counters>,
    profile: Option<(Duration, Duration)>,
}

impl Reporter {
    pub fn from_config(config: Configuration) -> Self {
        Self {
            date: Utc::now(),
            config,
            algorithm: None,
            outcome: None,
            counters: None,
            profile: None,
        }
    }

    pub fn set_algorithm(&mut self, algorithm: &dyn Algorithm) {
        self.algorithm.replace(AlgorithmInfo {
            name: algorithm.name(),
            version: algorithm.version(),
            parameters: algorithm.parameters(),
        });
        self.set_profile(algorithm.time_profile());
        self.set_counters(algorithm.counters());
    }

    pub fn set_outcome<P: Serialize>(
        &mut self,
        total_time: Duration,
        outcome: &Outcome,
        points: &[P],
    ) -> Result<()> {
        let sizes = outcome.classification.class_sizes();
        let kernels = outcome
            .kernels
            .iter()
            .zip(sizes.into_iter())
            .map(|(&index, size)| -> Result<Kernel> {
                Ok(Kernel {
                    index,
                    point: serde_json::to_value(&points[index])?,
                    size,
                })
            })
            .collect::<Result<Vec<Kernel>>>()?;
        self.outcome.replace(RunInfo {
            total_time,
            kernels,
            growth_steps: outcome.growth_steps,
            stabilization_passes: outcome.stabilization_passes,
            converged: outcome.converged,
            snapshots: outcome.snapshots.clone(),
        });
        Ok(())
    }

    pub fn set_counters(&mut self, (distance, growth): (u64, u64)) {
        self.counters.replace(Counters { distance, growth });
    }

    pub fn set_profile(&mut self, profile: (Duration, Duration)) {
        self.profile.replace(profile);
    }

    fn to_json(&self) -> Result<String> {
        let outcome = self.outcome.as_ref().context("no outcome registered")?;
        let algorithm = self.algorithm.as_ref().context("no algorithm registered")?;
        let counters = self.counters.as_ref().context("missing counters")?;
        let (growth_time, stabilization_time) = self.profile.context("missing profile")?;
        let report = Report {
            code_version: env!("CARGO_PKG_VERSION"),
            date: self.date.to_rfc3339(),
            params_sha: self.config.sha()?,
            algorithm: &algorithm.name,
            algorithm_version: algorithm.version,
            algorithm_params: &algorithm.parameters,
            stabilization: self.config.stabilization.describe(),
            objects: self.config.objects,
            threads: self.config.threads(),
            classes: outcome.kernels.len(),
            kernels: &outcome.kernels,
            growth_steps: outcome.growth_steps,
            stabilization_passes: outcome.stabilization_passes,
            converged: outcome.converged,
            total_time_ms: outcome.total_time.as_millis() as u64,
            growth_time_ms: growth_time.as_millis() as u64,
            stabilization_time_ms: stabilization_time.as_millis() as u64,
            distance_cnt: counters.distance,
            growth_cnt: counters.growth,
            snapshots: &outcome.snapshots,
        };
        serde_json::to_string_pretty(&report).context("serializing the report")
    }

    pub fn save(self) -> Result<()> {
        let json = self.to_json()?;
        match &self.config.output {
            Some(path) => {
                std::fs::write(path, json)
                    .with_context(|| format!("writing the report to {:?}", path))?;
                info!("Report written to {:?}", path);
            }
            None => println!("{}", json),
        }
        Ok(())
    }
}
