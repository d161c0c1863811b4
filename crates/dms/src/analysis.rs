//! DMS per-frame results

use serde::{Deserialize, Serialize};

use crate::detector::FaceBox;

/// Per-frame drowsiness result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrowsinessResult {
    /// Debounced alert flag
    pub is_drowsy: bool,

    /// Smoothed openness (3 decimals)
    pub ear_smoothed: f64,

    /// Raw openness (3 decimals)
    pub ear_raw: f64,

    /// Human-readable status
    pub message: String,

    /// Drowsiness score (1 decimal)
    pub drowsy_score: f64,

    /// Score as an integer percentage
    pub confidence: u8,

    /// Closure on this frame was a blink
    ///
    /// A blink never raises the score, but it can complete a confirmation
    /// window already running, so `is_blink` and a fresh alert may coincide.
    pub is_blink: bool,

    /// Last alert is still within its grace period
    pub in_grace_period: bool,

    /// Whether a face was detected
    pub face_detected: bool,

    /// Face bounding box in source-image pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_box: Option<FaceBox>,

    /// Mean frame brightness, 0-255 (1 decimal)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
}

impl DrowsinessResult {
    /// Build a face-present result, rounding values for display
    pub fn new(
        is_drowsy: bool,
        ear_smoothed: f64,
        ear_raw: f64,
        message: impl Into<String>,
        score: f64,
        is_blink: bool,
        in_grace_period: bool,
    ) -> Self {
        Self {
            is_drowsy,
            ear_smoothed: round_to(ear_smoothed, 3),
            ear_raw: round_to(ear_raw, 3),
            message: message.into(),
            drowsy_score: round_to(score, 1),
            confidence: confidence(score),
            is_blink,
            in_grace_period,
            face_detected: true,
            face_box: None,
            brightness: None,
        }
    }

    pub fn with_face_box(mut self, face_box: FaceBox) -> Self {
        self.face_box = Some(face_box);
        self
    }

    pub fn with_brightness(mut self, brightness: f64) -> Self {
        self.brightness = Some(round_to(brightness, 1));
        self
    }
}

/// Score mapped onto 0-100
pub fn confidence(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
