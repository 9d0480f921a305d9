use serde::{Deserialize, Serialize};

pub trait Distance {
    fn distance(&self, other: &Self) -> f64;
}

/// A point on the plane.
///
/// This is the point type of the canvas the heuristic was first drawn on,
/// and the one the `maxmin` driver works with. The algorithm itself never
/// looks inside a point: it only compares points for equality and hands
/// them to a distance function.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Distance for Point2D {
    fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[test]
fn test_euclidean_distance() {
    let a = Point2D::new(0.0, 0.0);
    let b = Point2D::new(3.0, 4.0);
    assert_eq!(a.distance(&b), 5.0);
    assert_eq!(b.distance(&a), 5.0);
    assert_eq!(a.distance(&a), 0.0);
}
