//! Per-subject detection state tracking

use ring_buffer::RingBuffer;

/// Detection state (tracked across frames for one monitored subject)
#[derive(Debug, Clone)]
pub struct DetectionState {
    /// Last raw openness samples, oldest evicted first
    pub history: RingBuffer<f64>,

    /// Drowsiness confidence in [0, 100]
    pub score: f64,

    /// When the current sustained closure started (ms)
    pub closure_start_ms: Option<u64>,

    /// When the score first crossed the drowsy threshold (ms)
    pub confirmation_start_ms: Option<u64>,

    /// When the most recent alert fired (ms)
    pub last_alert_ms: Option<u64>,

    /// Debounced alert flag
    pub in_alert: bool,

    /// Most recent closure was a blink
    pub blink: bool,
}

impl DetectionState {
    /// Create an empty state keeping `history_len` openness samples
    pub fn new(history_len: usize) -> Self {
        Self {
            history: RingBuffer::new(history_len),
            score: 0.0,
            closure_start_ms: None,
            confirmation_start_ms: None,
            last_alert_ms: None,
            in_alert: false,
            blink: false,
        }
    }

    /// Whether `now_ms` falls inside the grace period of the last alert
    pub fn in_grace_period(&self, now_ms: u64, grace_period_ms: u64) -> bool {
        self.last_alert_ms
            .is_some_and(|at| now_ms.saturating_sub(at) < grace_period_ms)
    }

    /// Clear tracking after the face is lost
    ///
    /// `in_alert` and `last_alert_ms` survive so the grace period outlives a
    /// momentary detection dropout.
    pub fn reset(&mut self) {
        self.history.clear();
        self.score = 0.0;
        self.closure_start_ms = None;
        self.confirmation_start_ms = None;
        self.blink = false;
    }
}

impl Default for DetectionState {
    fn default() -> Self {
        Self::new(ring_buffer::DEFAULT_CAPACITY)
    }
}
