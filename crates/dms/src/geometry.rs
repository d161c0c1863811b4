//! Eye aspect ratio (EAR) geometry

use serde::{Deserialize, Serialize};

/// 2D point in pixel coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Six ordered eye-contour points
///
/// 0 = outer corner, 1 = top-outer, 2 = top-inner,
/// 3 = inner corner, 4 = bottom-inner, 5 = bottom-outer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeLandmarks(pub [Point; 6]);

impl TryFrom<&[Point]> for EyeLandmarks {
    type Error = usize;

    /// Fails with the offending length unless exactly 6 points are given
    fn try_from(points: &[Point]) -> Result<Self, Self::Error> {
        <[Point; 6]>::try_from(points)
            .map(EyeLandmarks)
            .map_err(|_| points.len())
    }
}

impl EyeLandmarks {
    /// Eye aspect ratio: vertical opening over horizontal span
    ///
    /// A degenerate eye (coincident corners) yields 0.0.
    pub fn aspect_ratio(&self) -> f64 {
        let p = &self.0;
        let horizontal = p[0].distance(&p[3]);
        if horizontal == 0.0 {
            return 0.0;
        }
        (p[1].distance(&p[5]) + p[2].distance(&p[4])) / (2.0 * horizontal)
    }
}

/// Raw openness sample for a frame: mean of both eyes' EAR
pub fn frame_openness(left: &EyeLandmarks, right: &EyeLandmarks) -> f64 {
    (left.aspect_ratio() + right.aspect_ratio()) / 2.0
}
