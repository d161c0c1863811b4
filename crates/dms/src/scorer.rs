//! Drowsiness score: a leaky integrator with a confirmation window

use tracing::debug;

use crate::classifier::{ClosureClass, EyeZone};
use crate::config::DmsConfig;
use crate::state::DetectionState;

/// Upper bound of the drowsiness score
pub const MAX_SCORE: f64 = 100.0;

/// Result of a score update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreUpdate {
    /// Score after this frame
    pub score: f64,
    /// Score held above threshold for the full confirmation window
    pub confirmed: bool,
}

/// Update the drowsiness score for one frame
pub fn update_score(
    class: ClosureClass,
    smoothed: f64,
    now_ms: u64,
    state: &mut DetectionState,
    config: &DmsConfig,
) -> ScoreUpdate {
    let zone = EyeZone::of(smoothed, config);

    // Wide-open eyes can only lower the score.
    if zone == EyeZone::Open {
        let rate = if state.in_alert {
            config.recovery_decay
        } else {
            config.open_decay
        };
        state.score = (state.score * rate).max(0.0);
        if state.score < config.drowsy_threshold {
            state.confirmation_start_ms = None;
        }
        return ScoreUpdate {
            score: state.score,
            confirmed: false,
        };
    }

    if class.is_blink {
        // Score untouched; a window already running keeps counting.
        return ScoreUpdate {
            score: state.score,
            confirmed: confirm(now_ms, state, config),
        };
    }

    if class.is_closed {
        let increment = if smoothed < config.ear_deep {
            config.closed_increment * config.deep_closure_multiplier
        } else {
            config.closed_increment
        };
        state.score = (state.score + increment).min(MAX_SCORE);
    } else {
        let rate = match zone {
            EyeZone::Partial => config.partial_decay,
            _ => config.base_decay,
        };
        state.score = (state.score * rate).max(0.0);
    }

    ScoreUpdate {
        score: state.score,
        confirmed: confirm(now_ms, state, config),
    }
}

/// Advance the confirmation window; true once it has run long enough
fn confirm(now_ms: u64, state: &mut DetectionState, config: &DmsConfig) -> bool {
    if state.score < config.drowsy_threshold {
        state.confirmation_start_ms = None;
        return false;
    }

    let start = *state.confirmation_start_ms.get_or_insert(now_ms);
    let held_ms = now_ms.saturating_sub(start);
    debug!("Score {:.1} above threshold for {}ms", state.score, held_ms);
    held_ms >= config.min_confirm_ms
}
