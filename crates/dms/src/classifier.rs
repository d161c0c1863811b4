//! Blink vs. sustained closure classification

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DmsConfig;
use crate::state::DetectionState;

/// Openness band of a smoothed EAR value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EyeZone {
    /// At or above `ear_alert`
    Open,
    /// Naturally narrow, not drowsy
    Partial,
    /// Between the closed and partial thresholds
    Sleepy,
    /// Below `ear_closed`
    Closed,
}

impl EyeZone {
    pub fn of(smoothed: f64, config: &DmsConfig) -> Self {
        if smoothed >= config.ear_alert {
            EyeZone::Open
        } else if smoothed >= config.ear_partial {
            EyeZone::Partial
        } else if smoothed < config.ear_closed {
            EyeZone::Closed
        } else {
            EyeZone::Sleepy
        }
    }
}

/// Classification of one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClosureClass {
    pub is_blink: bool,
    pub is_closed: bool,
}

/// Classify a smoothed EAR value, updating closure tracking in `state`
pub fn classify(
    smoothed: f64,
    now_ms: u64,
    state: &mut DetectionState,
    config: &DmsConfig,
) -> ClosureClass {
    match EyeZone::of(smoothed, config) {
        EyeZone::Open => {
            if std::mem::take(&mut state.blink) {
                debug!("Eyes reopened after blink at {}ms", now_ms);
            }
            state.closure_start_ms = None;
            ClosureClass::default()
        }
        EyeZone::Partial => {
            state.closure_start_ms = None;
            ClosureClass::default()
        }
        EyeZone::Closed => {
            let start = *state.closure_start_ms.get_or_insert(now_ms);
            let duration_ms = now_ms.saturating_sub(start);

            if smoothed < config.ear_deep && duration_ms < config.max_blink_ms {
                state.blink = true;
                ClosureClass {
                    is_blink: true,
                    is_closed: true,
                }
            } else {
                ClosureClass {
                    is_blink: false,
                    is_closed: true,
                }
            }
        }
        EyeZone::Sleepy => {
            if let Some(start) = state.closure_start_ms.take() {
                debug!("Closure ended after {}ms", now_ms.saturating_sub(start));
            }
            ClosureClass::default()
        }
    }
}
