use anyhow::{Context, Result};
use log::info;
use maxmin_base::{
    dataset::{random_points, Dataset},
    types::Point2D,
};
use maxmin_parallel::Limits;
use serde::{Deserialize, Serialize};
use sha2::Digest;
use std::path::PathBuf;

pub trait Sha {
    fn update_sha<D: Digest>(&self, sha: &mut D);

    fn sha(&self) -> Result<String> {
        let mut sha = sha2::Sha256::new();
        self.update_sha(&mut sha);
        Ok(format!("{:x}", sha.result()))
    }
}

impl<T: Sha> Sha for Option<T> {
    fn update_sha<D: Digest>(&self, sha: &mut D) {
        match self {
            Some(x) => {
                sha.input("some");
                x.update_sha(sha);
            }
            None => sha.input("none"),
        }
    }
}

impl Sha for usize {
    fn update_sha<D: Digest>(&self, sha: &mut D) {
        sha.input(self.to_le_bytes());
    }
}

impl Sha for u64 {
    fn update_sha<D: Digest>(&self, sha: &mut D) {
        sha.input(self.to_le_bytes());
    }
}

impl Sha for u32 {
    fn update_sha<D: Digest>(&self, sha: &mut D) {
        sha.input(self.to_le_bytes());
    }
}

impl Sha for bool {
    fn update_sha<D: Digest>(&self, sha: &mut D) {
        sha.input([*self as u8]);
    }
}

impl Sha for String {
    fn update_sha<D: Digest>(&self, sha: &mut D) {
        sha.input(self.as_bytes());
    }
}

/// Where the points of a run come from.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum DatasetConfig {
    /// Points with integer coordinates scattered over a canvas.
    Random { width: u32, height: u32, seed: u64 },
    /// Points read from a file, see [Dataset].
    File { path: PathBuf },
}

impl Sha for DatasetConfig {
    fn update_sha<D: Digest>(&self, sha: &mut D) {
        match &self {
            DatasetConfig::Random {
                width,
                height,
                seed,
            } => {
                sha.input("random");
                width.update_sha(sha);
                height.update_sha(sha);
                seed.update_sha(sha);
            }
            DatasetConfig::File { path } => {
                sha.input("file");
                sha.input(path.to_string_lossy().as_bytes());
            }
        }
    }
}

/// How many times the kernels are replaced by the medoids of their classes
/// once growth has stopped.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum StabilizationConfig {
    Once,
    UntilConverged { max_passes: usize },
}

impl Default for StabilizationConfig {
    fn default() -> Self {
        Self::Once
    }
}

impl StabilizationConfig {
    pub fn max_passes(&self) -> usize {
        match self {
            Self::Once => 1,
            Self::UntilConverged { max_passes } => std::cmp::max(*max_passes, 1),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Once => "Once".to_owned(),
            Self::UntilConverged { max_passes } => format!("UntilConverged({})", max_passes),
        }
    }
}

impl Sha for StabilizationConfig {
    fn update_sha<D: Digest>(&self, sha: &mut D) {
        match &self {
            Self::Once => sha.input("once"),
            Self::UntilConverged { max_passes } => {
                sha.input("until-converged");
                max_passes.update_sha(sha);
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ParallelConfiguration {
    /// number of threads to use
    pub threads: usize,
}

impl Sha for ParallelConfiguration {
    fn update_sha<D: Digest>(&self, sha: &mut D) {
        self.threads.update_sha(sha);
    }
}

impl ParallelConfiguration {
    pub fn pool(&self) -> Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .context("building the thread pool")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Configuration {
    /// number of points of the run
    pub objects: usize,
    /// seed for the choice of the first kernel
    pub seed: u64,
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub stabilization: StabilizationConfig,
    pub parallel: Option<ParallelConfiguration>,
    /// accept any number of points, not only the production range
    #[serde(default)]
    pub relaxed_limits: bool,
    /// where to write the report, stdout if missing
    pub output: Option<PathBuf>,
}

impl Sha for Configuration {
    fn update_sha<D: Digest>(&self, sha: &mut D) {
        self.objects.update_sha(sha);
        self.seed.update_sha(sha);
        self.dataset.update_sha(sha);
        self.stabilization.update_sha(sha);
        self.parallel.update_sha(sha);
        self.relaxed_limits.update_sha(sha);
    }
}

impl Configuration {
    /// Loads the configuration either from a json file or from the same
    /// json encoded as base64.
    pub fn load(spec: String) -> anyhow::Result<Self> {
        let path = PathBuf::from(&spec);
        let config: Configuration = if path.is_file() {
            serde_json::from_reader(std::fs::File::open(path)?)?
        } else {
            let decoded_str = String::from_utf8(
                base64::decode(spec).context("configuration is neither a file nor base64")?,
            )?;
            serde_json::from_str(&decoded_str)?
        };
        Ok(config)
    }

    pub fn encode(&self) -> Result<String> {
        Ok(base64::encode(&serde_json::to_string(&self)?))
    }

    pub fn limits(&self) -> Limits {
        if self.relaxed_limits {
            Limits::relaxed()
        } else {
            Limits::default()
        }
    }

    pub fn threads(&self) -> Option<usize> {
        self.parallel.as_ref().map(|p| p.threads)
    }

    pub fn points(&self) -> Result<Vec<Point2D>> {
        match &self.dataset {
            DatasetConfig::Random {
                width,
                height,
                seed,
            } => {
                info!(
                    "Generating {} random points on a {}x{} canvas",
                    self.objects, width, height
                );
                random_points(self.objects, *width, *height, *seed)
            }
            DatasetConfig::File { path } => {
                info!("Reading points from {:?}", path);
                Dataset::new(path).to_vec()
            }
        }
    }
}
