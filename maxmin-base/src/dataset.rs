use crate::types::Point2D;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

/// Above this many points, random generation no longer insists on
/// distinct coordinates.
pub const UNIQUE_POINTS_THRESHOLD: usize = 10000;

/// A file of points.
///
/// Files ending in `.gz` are gzip-compressed MessagePack arrays, anything
/// else is read as a JSON array.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Dataset {
    path: PathBuf,
}

impl Dataset {
    pub fn new<I: Into<PathBuf>>(path: I) -> Self {
        Self { path: path.into() }
    }

    fn is_compressed(&self) -> bool {
        self.path
            .extension()
            .map(|ext| ext == "gz")
            .unwrap_or(false)
    }

    pub fn to_vec<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let file = BufReader::new(
            std::fs::File::open(&self.path)
                .with_context(|| format!("opening dataset {:?}", self.path))?,
        );
        let points: Vec<T> = if self.is_compressed() {
            rmp_serde::from_read(GzDecoder::new(file)).context("reading msgpack points")?
        } else {
            serde_json::from_reader(file).context("reading json points")?
        };
        debug!("Read {} points from {:?}", points.len(), self.path);
        Ok(points)
    }

    pub fn save<T: Serialize>(&self, points: &[T]) -> Result<()> {
        let file = BufWriter::new(
            std::fs::File::create(&self.path)
                .with_context(|| format!("creating dataset {:?}", self.path))?,
        );
        if self.is_compressed() {
            let mut output = GzEncoder::new(file, Compression::default());
            rmp_serde::encode::write(&mut output, points).context("writing msgpack points")?;
            output.finish().context("closing compressed dataset")?;
        } else {
            serde_json::to_writer(file, points).context("writing json points")?;
        }
        Ok(())
    }
}

/// Scatters `amount` points with integer coordinates over a
/// `width` x `height` canvas.
///
/// Coordinates are distinct as long as `amount` does not exceed
/// [UNIQUE_POINTS_THRESHOLD]; bigger sets may contain duplicates.
pub fn random_points(amount: usize, width: u32, height: u32, seed: u64) -> Result<Vec<Point2D>> {
    if width == 0 || height == 0 {
        anyhow::bail!("empty canvas {}x{}", width, height);
    }
    let unique = amount <= UNIQUE_POINTS_THRESHOLD;
    if unique && (width as usize) * (height as usize) < amount {
        anyhow::bail!(
            "cannot place {} distinct points on a {}x{} canvas",
            amount,
            width,
            height
        );
    }

    let mut rng = XorShiftRng::seed_from_u64(seed);
    let mut seen = HashSet::new();
    let mut points = Vec::with_capacity(amount);
    while points.len() < amount {
        let x = rng.gen_range(0..width);
        let y = rng.gen_range(0..height);
        if !unique || seen.insert((x, y)) {
            points.push(Point2D::new(x as f64, y as f64));
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_points_are_distinct_and_on_canvas() {
        let points = random_points(2000, 100, 50, 1234).unwrap();
        assert_eq!(points.len(), 2000);
        for p in &points {
            assert!(p.x >= 0.0 && p.x < 100.0);
            assert!(p.y >= 0.0 && p.y < 50.0);
        }
        let distinct: HashSet<(u64, u64)> =
            points.iter().map(|p| (p.x as u64, p.y as u64)).collect();
        assert_eq!(distinct.len(), points.len());
    }

    #[test]
    fn random_points_are_reproducible() {
        let a = random_points(1000, 640, 480, 42).unwrap();
        let b = random_points(1000, 640, 480, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn too_small_canvas() {
        assert!(random_points(1000, 10, 10, 0).is_err());
        assert!(random_points(10, 0, 10, 0).is_err());
    }

    #[test]
    fn save_and_load() {
        let points = random_points(50, 20, 20, 7).unwrap();
        let dir = std::env::temp_dir();
        for name in &["maxmin-dataset-test.msgpack.gz", "maxmin-dataset-test.json"] {
            let dataset = Dataset::new(dir.join(name));
            dataset.save(&points).unwrap();
            let loaded: Vec<Point2D> = dataset.to_vec().unwrap();
            assert_eq!(loaded, points);
            std::fs::remove_file(dir.join(name)).unwrap();
        }
    }
}
