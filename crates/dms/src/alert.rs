//! Debounced alert controller with grace period and recovery hysteresis

use tracing::info;

use crate::classifier::EyeZone;
use crate::config::DmsConfig;
use crate::state::DetectionState;

pub const MSG_DROWSY: &str = "Drowsiness detected!";
pub const MSG_STILL_DROWSY: &str = "Still drowsy - stay alert!";
pub const MSG_RECOVERED: &str = "Recovered!";
pub const MSG_RECOVERING: &str = "Recovering...";
pub const MSG_VERY_DROWSY: &str = "Getting very drowsy...";
pub const MSG_HEAVY: &str = "Eyes getting heavy...";
pub const MSG_SLEEPY: &str = "Eyes look sleepy...";
pub const MSG_MONITORING: &str = "Monitoring...";
pub const MSG_ALERT: &str = "Alert";

/// Score above which an ongoing alert still reports full drowsiness
const SEVERE_SCORE: f64 = 70.0;
/// Advisory bands for the non-alerted state
const VERY_DROWSY_SCORE: f64 = 50.0;
const HEAVY_SCORE: f64 = 30.0;

/// Decide the alert flag for this frame and return the status message
pub fn update_alert(
    confirmed: bool,
    in_grace: bool,
    smoothed: f64,
    now_ms: u64,
    state: &mut DetectionState,
    config: &DmsConfig,
) -> &'static str {
    let score = state.score;

    let message = if confirmed && !in_grace {
        if !state.in_alert {
            info!("Drowsiness alert raised (score {:.1}, EAR {:.3})", score, smoothed);
        }
        state.in_alert = true;
        state.last_alert_ms = Some(now_ms);
        MSG_DROWSY
    } else if state.in_alert {
        if smoothed >= config.ear_alert || score < config.recovery_score {
            state.in_alert = false;
            info!("Drowsiness alert cleared (score {:.1}, EAR {:.3})", score, smoothed);
            if score < config.recovered_score {
                MSG_RECOVERED
            } else {
                MSG_RECOVERING
            }
        } else if score >= SEVERE_SCORE {
            MSG_DROWSY
        } else {
            MSG_STILL_DROWSY
        }
    } else {
        advisory(score, smoothed, config)
    };

    expire_alert(now_ms, state, config);
    message
}

/// Drop a lingering alert once its grace period is over and the score is low
pub fn expire_alert(now_ms: u64, state: &mut DetectionState, config: &DmsConfig) {
    if state.in_alert
        && state.last_alert_ms.is_some()
        && !state.in_grace_period(now_ms, config.grace_period_ms)
        && state.score < config.recovered_score
    {
        info!("Drowsiness alert expired after grace period");
        state.in_alert = false;
    }
}

fn advisory(score: f64, smoothed: f64, config: &DmsConfig) -> &'static str {
    if score > VERY_DROWSY_SCORE {
        return MSG_VERY_DROWSY;
    }
    if score > HEAVY_SCORE {
        return MSG_HEAVY;
    }
    match EyeZone::of(smoothed, config) {
        EyeZone::Open => MSG_ALERT,
        EyeZone::Partial => MSG_MONITORING,
        EyeZone::Sleepy | EyeZone::Closed => MSG_SLEEPY,
    }
}
