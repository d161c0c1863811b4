//! Face landmark detection seam and eye extraction

use frame_decode::VideoFrame;
use serde::{Deserialize, Serialize};

use crate::geometry::{EyeLandmarks, Point};
use crate::DmsError;

/// Face-mesh indices of the left eye contour, in EAR order
pub const LEFT_EYE_INDICES: [usize; 6] = [33, 160, 158, 133, 153, 144];

/// Face-mesh indices of the right eye contour, in EAR order
pub const RIGHT_EYE_INDICES: [usize; 6] = [362, 385, 387, 263, 373, 380];

/// Landmark detector (face mesh or similar)
///
/// Model loading and teardown belong to the implementor.
pub trait LandmarkDetector {
    /// Detect at most one face; `Ok(None)` when no face is visible
    fn detect(&mut self, frame: &VideoFrame) -> Result<Option<FaceLandmarks>, DmsError>;
}

impl<T: LandmarkDetector + ?Sized> LandmarkDetector for Box<T> {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Option<FaceLandmarks>, DmsError> {
        (**self).detect(frame)
    }
}

/// Face landmarks with coordinates normalized to [0, 1]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    pub points: Vec<Point>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Pixel coordinates (truncated) of the landmark at `index`
    fn pixel(&self, index: usize, width: u32, height: u32) -> Option<Point> {
        self.points.get(index).map(|p| {
            Point::new(
                (p.x * width as f64).trunc(),
                (p.y * height as f64).trunc(),
            )
        })
    }

    /// Extract a 6-point eye contour in pixel coordinates
    pub fn eye(&self, indices: &[usize; 6], width: u32, height: u32) -> Result<EyeLandmarks, DmsError> {
        let mut points = [Point::default(); 6];
        for (slot, &index) in points.iter_mut().zip(indices) {
            *slot = self.pixel(index, width, height).ok_or_else(|| {
                DmsError::Processing(format!(
                    "landmark {} missing (detector returned {} points)",
                    index,
                    self.points.len()
                ))
            })?;
        }
        Ok(EyeLandmarks(points))
    }

    /// Left and right eye contours
    pub fn eyes(&self, width: u32, height: u32) -> Result<(EyeLandmarks, EyeLandmarks), DmsError> {
        Ok((
            self.eye(&LEFT_EYE_INDICES, width, height)?,
            self.eye(&RIGHT_EYE_INDICES, width, height)?,
        ))
    }

    /// Bounding box of all landmarks, clamped to the frame
    pub fn face_box(&self, width: u32, height: u32) -> Option<FaceBox> {
        let (w, h) = (width as f64, height as f64);
        let mut pixels = self
            .points
            .iter()
            .map(|p| ((p.x * w).trunc(), (p.y * h).trunc()));

        let (x0, y0) = pixels.next()?;
        let (left, top, right, bottom) = pixels.fold((x0, y0, x0, y0), |(l, t, r, b), (x, y)| {
            (l.min(x), t.min(y), r.max(x), b.max(y))
        });

        Some(FaceBox {
            left: left.max(0.0) as i32,
            top: top.max(0.0) as i32,
            right: right.min(w) as i32,
            bottom: bottom.min(h) as i32,
        })
    }
}

/// Face bounding box in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl FaceBox {
    /// Map from processing resolution back to source-image pixels
    pub fn scale(&self, scale_x: f64, scale_y: f64) -> Self {
        Self {
            left: (self.left as f64 * scale_x) as i32,
            top: (self.top as f64 * scale_y) as i32,
            right: (self.right as f64 * scale_x) as i32,
            bottom: (self.bottom as f64 * scale_y) as i32,
        }
    }
}
