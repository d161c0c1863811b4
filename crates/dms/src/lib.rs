//! Driver Monitoring System (DMS)
//!
//! Frame-by-frame drowsiness detection from webcam images:
//! - Eye aspect ratio (EAR) from face-mesh eye landmarks
//! - Recency-weighted smoothing of the openness signal
//! - Blink vs. sustained closure classification
//! - Leaky-integrator drowsiness score with a confirmation window
//! - Debounced alerting with grace period and recovery hysteresis

pub mod alert;
pub mod analysis;
pub mod classifier;
pub mod config;
pub mod detector;
pub mod geometry;
pub mod monitor;
pub mod scorer;
pub mod smoothing;
pub mod state;

pub use analysis::DrowsinessResult;
pub use classifier::{ClosureClass, EyeZone};
pub use self::config::DmsConfig;
pub use detector::{FaceBox, FaceLandmarks, LandmarkDetector};
pub use geometry::{frame_openness, EyeLandmarks, Point};
pub use monitor::DrowsinessMonitor;
pub use scorer::ScoreUpdate;
pub use state::DetectionState;

use std::time::Instant;

use frame_decode::FrameError;
use thiserror::Error;
use tracing::debug;

/// DMS error types
#[derive(Error, Debug)]
pub enum DmsError {
    /// Missing or unparseable frame
    #[error("Invalid input: {0}")]
    Input(String),

    /// Unexpected failure mid-pipeline
    #[error("Processing failed: {0}")]
    Processing(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DmsError {
    /// Whether the caller sent bad data (as opposed to a server-side failure)
    pub fn is_input(&self) -> bool {
        matches!(self, DmsError::Input(_))
    }

    /// HTTP-style status code for transports
    pub fn status_code(&self) -> u16 {
        if self.is_input() {
            400
        } else {
            500
        }
    }
}

impl From<FrameError> for DmsError {
    fn from(e: FrameError) -> Self {
        DmsError::Input(e.to_string())
    }
}

/// Driver monitoring module: decode, detect landmarks, monitor
pub struct DmsModule<D> {
    detector: D,
    monitor: DrowsinessMonitor,
    epoch: Instant,
}

impl<D: LandmarkDetector> DmsModule<D> {
    /// Create a new DMS module with configuration and a landmark detector
    pub fn new(config: DmsConfig, detector: D) -> Result<Self, DmsError> {
        Ok(Self {
            detector,
            monitor: DrowsinessMonitor::new(config)?,
            epoch: Instant::now(),
        })
    }

    /// Analyze one encoded frame, timestamped on arrival
    pub fn process_frame(&mut self, bytes: &[u8]) -> Result<DrowsinessResult, DmsError> {
        let now_ms = self.epoch.elapsed().as_millis() as u64;
        self.process_frame_at(bytes, now_ms)
    }

    /// Analyze one encoded frame captured at `now_ms`
    ///
    /// Decoding and landmark extraction finish before any state is touched,
    /// so a failed frame leaves the monitor unchanged.
    pub fn process_frame_at(&mut self, bytes: &[u8], now_ms: u64) -> Result<DrowsinessResult, DmsError> {
        let config = self.monitor.config();
        let decoded = frame_decode::decode(bytes, config.processing_width, config.processing_height)?;
        let frame = &decoded.frame;
        let brightness = frame.mean_brightness();
        debug!("Image brightness: {:.1}/255", brightness);

        let Some(landmarks) = self.detector.detect(frame)? else {
            return Ok(self.monitor.face_lost(now_ms, Some(brightness)));
        };

        let (left, right) = landmarks.eyes(frame.width, frame.height)?;
        let face_box = landmarks
            .face_box(frame.width, frame.height)
            .map(|b| b.scale(decoded.scale_x(), decoded.scale_y()));

        debug!("EAR left {:.3} right {:.3}", left.aspect_ratio(), right.aspect_ratio());

        let openness = frame_openness(&left, &right);
        if !openness.is_finite() {
            return Err(DmsError::Processing("non-finite eye aspect ratio".into()));
        }

        let result = self
            .monitor
            .process_openness(openness, now_ms)?
            .with_brightness(brightness);

        Ok(match face_box {
            Some(b) => result.with_face_box(b),
            None => result,
        })
    }

    pub fn monitor(&self) -> &DrowsinessMonitor {
        &self.monitor
    }

    /// Reset driver state (on driver change)
    pub fn reset_state(&mut self) {
        self.monitor.reset_state();
    }
}
