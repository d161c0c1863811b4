//! Per-subject drowsiness monitor: smoothing, classification, scoring, alerting

use tracing::{debug, warn};

use crate::alert::{self, update_alert};
use crate::analysis::DrowsinessResult;
use crate::classifier::classify;
use crate::config::DmsConfig;
use crate::scorer::update_score;
use crate::smoothing::smooth;
use crate::state::DetectionState;
use crate::DmsError;

pub const MSG_NO_FACE: &str = "No face detected";
pub const MSG_TOO_DARK: &str = "No face detected - Too dark, improve lighting";
pub const MSG_TOO_BRIGHT: &str = "No face detected - Too bright, reduce lighting";
pub const MSG_POSITION_FACE: &str = "No face detected - Position face in frame";

/// Temporal drowsiness state machine for one camera stream
#[derive(Debug, Clone)]
pub struct DrowsinessMonitor {
    config: DmsConfig,
    state: DetectionState,
}

impl DrowsinessMonitor {
    /// Create a monitor with validated configuration
    pub fn new(config: DmsConfig) -> Result<Self, DmsError> {
        config.validate()?;
        Ok(Self {
            state: DetectionState::new(config.history_len),
            config,
        })
    }

    pub fn config(&self) -> &DmsConfig {
        &self.config
    }

    pub fn state(&self) -> &DetectionState {
        &self.state
    }

    /// Process one frame's raw openness sample taken at `now_ms`
    ///
    /// A non-finite sample is rejected before it reaches the history.
    pub fn process_openness(&mut self, ear_raw: f64, now_ms: u64) -> Result<DrowsinessResult, DmsError> {
        if !ear_raw.is_finite() {
            warn!("Rejected non-finite EAR sample at {}ms", now_ms);
            return Err(DmsError::Processing("non-finite eye aspect ratio".into()));
        }

        let config = &self.config;
        let state = &mut self.state;

        let smoothed = smooth(&mut state.history, ear_raw, &config.smoothing_weights);
        let class = classify(smoothed, now_ms, state, config);
        let update = update_score(class, smoothed, now_ms, state, config);

        let in_grace = state.in_grace_period(now_ms, config.grace_period_ms);
        let message = update_alert(update.confirmed, in_grace, smoothed, now_ms, state, config);

        debug!(
            "EAR raw {:.3} smoothed {:.3} | score {:.1} | blink {} closed {} | confirmed {} alert {}",
            ear_raw, smoothed, update.score, class.is_blink, class.is_closed, update.confirmed, state.in_alert
        );

        Ok(DrowsinessResult::new(
            state.in_alert,
            smoothed,
            ear_raw,
            message,
            update.score,
            class.is_blink,
            in_grace,
        ))
    }

    /// Handle a frame with no detectable face
    ///
    /// Tracking is reset, but an alert inside its grace period keeps being
    /// reported so a detection dropout cannot make it flicker.
    pub fn face_lost(&mut self, now_ms: u64, brightness: Option<f64>) -> DrowsinessResult {
        self.state.reset();
        alert::expire_alert(now_ms, &mut self.state, &self.config);
        let in_grace = self
            .state
            .in_grace_period(now_ms, self.config.grace_period_ms);

        let message = match brightness {
            Some(b) if b < self.config.dark_brightness => MSG_TOO_DARK,
            Some(b) if b > self.config.bright_brightness => MSG_TOO_BRIGHT,
            Some(_) => MSG_POSITION_FACE,
            None => MSG_NO_FACE,
        };
        warn!("{} (alert held: {})", message, self.state.in_alert);

        let result = DrowsinessResult {
            is_drowsy: self.state.in_alert,
            message: message.to_string(),
            in_grace_period: in_grace,
            face_detected: false,
            ..Default::default()
        };
        match brightness {
            Some(b) => result.with_brightness(b),
            None => result,
        }
    }

    /// Reset all state, including the alert (on subject change)
    pub fn reset_state(&mut self) {
        self.state = DetectionState::new(self.config.history_len);
    }
}

impl Default for DrowsinessMonitor {
    fn default() -> Self {
        Self {
            config: DmsConfig::default(),
            state: DetectionState::new(DmsConfig::default().history_len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{MSG_ALERT, MSG_DROWSY};
    use proptest::prelude::*;

    /// Feed `values` spaced `step_ms` apart starting at `*now`
    fn feed(monitor: &mut DrowsinessMonitor, values: &[f64], now: &mut u64, step_ms: u64) -> Vec<DrowsinessResult> {
        values
            .iter()
            .map(|&v| {
                *now += step_ms;
                monitor.process_openness(v, *now).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_open_eyes_stay_alert() {
        let mut monitor = DrowsinessMonitor::default();
        let mut now = 0;

        let results = feed(&mut monitor, &[0.35; 5], &mut now, 100);

        for r in &results {
            assert!(!r.is_drowsy);
            assert_eq!(r.drowsy_score, 0.0);
            assert_eq!(r.message, MSG_ALERT);
        }
    }

    #[test]
    fn test_drowsy_then_fast_recovery() {
        let mut monitor = DrowsinessMonitor::default();
        let mut now = 0;

        feed(&mut monitor, &[0.35; 5], &mut now, 100);
        let closing = feed(&mut monitor, &[0.15; 5], &mut now, 100);

        assert!(closing[..4].iter().all(|r| !r.is_drowsy));
        let last = closing.last().unwrap();
        assert!(last.is_drowsy);
        assert_eq!(last.message, MSG_DROWSY);
        assert!(last.drowsy_score >= 35.0);
        // Deep closure still inside the blink window completes the confirmation
        assert!(last.is_blink);

        let reopening = feed(&mut monitor, &[0.35; 3], &mut now, 100);
        assert!(reopening[..2].iter().any(|r| !r.is_drowsy));
        assert!(!reopening.last().unwrap().is_drowsy);
        assert!(reopening[1].drowsy_score < 40.0);
    }

    #[test]
    fn test_sustained_closure_escalates() {
        let mut monitor = DrowsinessMonitor::default();
        let mut now = 0;

        feed(&mut monitor, &[0.35; 5], &mut now, 100);
        let results = feed(&mut monitor, &[0.10; 12], &mut now, 100);

        let last = results.last().unwrap();
        assert!(last.is_drowsy);
        assert_eq!(last.drowsy_score, 100.0);
        assert_eq!(last.confidence, 100);
    }

    #[test]
    fn test_blink_leaves_score_unchanged() {
        let mut monitor = DrowsinessMonitor::default();

        let blink = monitor.process_openness(0.15, 1_000).unwrap();
        assert!(blink.is_blink);
        assert_eq!(blink.drowsy_score, 0.0);

        let open = monitor.process_openness(0.35, 1_100).unwrap();
        assert!(!open.is_blink);
        assert!(!open.is_drowsy);
        assert_eq!(open.drowsy_score, 0.0);
    }

    #[test]
    fn test_face_lost_keeps_alert_within_grace() {
        let mut monitor = DrowsinessMonitor::default();
        let mut now = 0;
        feed(&mut monitor, &[0.35; 5], &mut now, 100);
        feed(&mut monitor, &[0.15; 5], &mut now, 100);
        assert!(monitor.state().in_alert);

        let lost = monitor.face_lost(now + 100, Some(120.0));
        assert!(lost.is_drowsy);
        assert!(lost.in_grace_period);
        assert!(!lost.face_detected);
        assert_eq!(lost.message, MSG_POSITION_FACE);
        assert_eq!(monitor.state().score, 0.0);
        assert!(monitor.state().history.is_empty());

        let later = monitor.face_lost(now + 5_000, None);
        assert!(!later.is_drowsy);
        assert!(!later.in_grace_period);
        assert_eq!(later.message, MSG_NO_FACE);
    }

    #[test]
    fn test_face_lost_brightness_messages() {
        let mut monitor = DrowsinessMonitor::default();
        assert_eq!(monitor.face_lost(0, Some(20.0)).message, MSG_TOO_DARK);
        assert_eq!(monitor.face_lost(0, Some(230.0)).message, MSG_TOO_BRIGHT);
        assert_eq!(monitor.face_lost(0, Some(20.04)).brightness, Some(20.0));
    }

    #[test]
    fn test_reset_state_clears_alert() {
        let mut monitor = DrowsinessMonitor::default();
        let mut now = 0;
        feed(&mut monitor, &[0.10; 10], &mut now, 100);
        assert!(monitor.state().in_alert);

        monitor.reset_state();
        assert!(!monitor.state().in_alert);
        assert_eq!(monitor.state().last_alert_ms, None);
    }

    #[test]
    fn test_non_finite_sample_rejected() {
        let mut monitor = DrowsinessMonitor::default();
        let mut now = 0;
        feed(&mut monitor, &[0.35; 5], &mut now, 100);
        let history: Vec<f64> = monitor.state().history.iter().copied().collect();

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            now += 100;
            let err = monitor.process_openness(bad, now).unwrap_err();
            assert_eq!(err.status_code(), 500);
        }
        let after: Vec<f64> = monitor.state().history.iter().copied().collect();
        assert_eq!(after, history);

        // Closing still drives the score after the rejected frames
        let closing = feed(&mut monitor, &[0.10; 6], &mut now, 100);
        let last = closing.last().unwrap();
        assert!(last.ear_smoothed.is_finite());
        assert!(last.drowsy_score > 0.0);
        assert!(last.is_drowsy);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = DmsConfig {
            history_len: 1,
            ..Default::default()
        };
        assert!(DrowsinessMonitor::new(config).is_err());
    }

    proptest! {
        #[test]
        fn alert_is_sticky_within_grace(
            closing in 6usize..15,
            after in prop::collection::vec((0.0f64..0.5, 10u64..200), 1..30),
        ) {
            let mut monitor = DrowsinessMonitor::default();
            let mut now = 0;
            feed(&mut monitor, &vec![0.10; closing], &mut now, 100);
            prop_assume!(monitor.state().in_alert);

            for (ear, dt) in after {
                now += dt;
                let was_alert = monitor.state().in_alert;
                let in_grace = monitor
                    .state()
                    .in_grace_period(now, monitor.config().grace_period_ms);
                let result = monitor.process_openness(ear, now).unwrap();
                if was_alert && in_grace && !result.is_drowsy {
                    let recovered = monitor.state().score < monitor.config().recovery_score
                        || result.ear_smoothed >= monitor.config().ear_alert - 5e-4;
                    prop_assert!(recovered);
                }
            }
        }

        #[test]
        fn score_bounded_end_to_end(samples in prop::collection::vec((0.0f64..0.6, 0u64..300), 1..80)) {
            let mut monitor = DrowsinessMonitor::default();
            let mut now = 0;
            for (ear, dt) in samples {
                now += dt;
                let result = monitor.process_openness(ear, now).unwrap();
                prop_assert!((0.0..=100.0).contains(&result.drowsy_score));
                prop_assert!(result.confidence <= 100);
            }
        }
    }
}
