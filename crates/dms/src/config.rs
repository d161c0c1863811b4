//! DMS configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::DmsError;

/// Environment variable prefix for overrides (e.g. `DMS_EAR_ALERT=0.3`)
pub const ENV_PREFIX: &str = "DMS";

/// DMS configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmsConfig {
    /// EAR at or above which eyes are definitely open
    pub ear_alert: f64,
    /// EAR at or above which eyes are naturally narrow but not drowsy
    pub ear_partial: f64,
    /// EAR below which a sustained closure is suspected
    pub ear_closed: f64,
    /// EAR below which eyes are very closed
    pub ear_deep: f64,

    /// Longest deep closure still counted as a blink (milliseconds)
    pub max_blink_ms: u64,

    /// Openness samples kept for smoothing
    pub history_len: usize,
    /// Smoothing weights, most recent sample first
    pub smoothing_weights: [f64; 3],

    /// Score added per closed frame
    pub closed_increment: f64,
    /// Increment multiplier below `ear_deep`
    pub deep_closure_multiplier: f64,
    /// Score at which confirmation starts
    pub drowsy_threshold: f64,
    /// Time the score must stay above threshold (milliseconds)
    pub min_confirm_ms: u64,

    /// Per-frame decay with wide-open eyes while alerted
    pub recovery_decay: f64,
    /// Per-frame decay with wide-open eyes otherwise
    pub open_decay: f64,
    /// Per-frame decay in the partial zone
    pub partial_decay: f64,
    /// Per-frame decay below the partial zone
    pub base_decay: f64,

    /// Alert stickiness after it fires (milliseconds)
    pub grace_period_ms: u64,
    /// Score below which an active alert is dropped
    pub recovery_score: f64,
    /// Score below which the subject counts as fully recovered
    pub recovered_score: f64,

    /// Mean brightness below which a missing face is blamed on darkness
    pub dark_brightness: f64,
    /// Mean brightness above which a missing face is blamed on glare
    pub bright_brightness: f64,

    /// Frame width used for landmark detection
    pub processing_width: u32,
    /// Frame height used for landmark detection
    pub processing_height: u32,
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            ear_alert: 0.28,
            ear_partial: 0.24,
            ear_closed: 0.24,
            ear_deep: 0.18,
            max_blink_ms: 400,
            history_len: 10,
            smoothing_weights: [0.5, 0.3, 0.2],
            closed_increment: 40.0,
            deep_closure_multiplier: 2.0,
            drowsy_threshold: 35.0,
            min_confirm_ms: 300,
            recovery_decay: 0.50,
            open_decay: 0.75,
            partial_decay: 0.75,
            base_decay: 0.85,
            grace_period_ms: 2000,
            recovery_score: 40.0,
            recovered_score: 20.0,
            dark_brightness: 50.0,
            bright_brightness: 200.0,
            processing_width: frame_decode::PROCESSING_WIDTH,
            processing_height: frame_decode::PROCESSING_HEIGHT,
        }
    }
}

impl DmsConfig {
    /// Create strict config (alerts sooner)
    pub fn strict() -> Self {
        Self {
            drowsy_threshold: 30.0,
            min_confirm_ms: 200,
            max_blink_ms: 300,
            ..Default::default()
        }
    }

    /// Create lenient config (fewer false alarms)
    pub fn lenient() -> Self {
        Self {
            drowsy_threshold: 50.0,
            min_confirm_ms: 600,
            closed_increment: 30.0,
            ..Default::default()
        }
    }

    /// Load configuration: defaults, then an optional file, then `DMS_*` env vars
    pub fn load(path: Option<&Path>) -> Result<Self, DmsError> {
        Self::load_over(Self::default(), path)
    }

    /// Like [`DmsConfig::load`], layered over a preset instead of the defaults
    pub fn load_over(base: Self, path: Option<&Path>) -> Result<Self, DmsError> {
        let defaults = ::config::Config::try_from(&base)
            .map_err(|e| DmsError::Config(e.to_string()))?;

        let mut builder = ::config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            info!("Loading DMS config from {}", path.display());
            builder = builder.add_source(::config::File::from(path));
        }
        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true),
        );

        let loaded: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| DmsError::Config(e.to_string()))?;

        loaded.validate()?;
        debug!("Effective DMS config: {:?}", loaded);
        Ok(loaded)
    }

    /// Check that thresholds and rates are mutually consistent
    pub fn validate(&self) -> Result<(), DmsError> {
        if !(self.ear_deep <= self.ear_closed
            && self.ear_closed <= self.ear_partial
            && self.ear_partial <= self.ear_alert)
        {
            return Err(DmsError::Config(format!(
                "EAR thresholds must satisfy deep <= closed <= partial <= alert, got {} / {} / {} / {}",
                self.ear_deep, self.ear_closed, self.ear_partial, self.ear_alert
            )));
        }

        for (name, rate) in [
            ("recovery_decay", self.recovery_decay),
            ("open_decay", self.open_decay),
            ("partial_decay", self.partial_decay),
            ("base_decay", self.base_decay),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(DmsError::Config(format!(
                    "{name} must be within [0, 1], got {rate}"
                )));
            }
        }

        if self.history_len < self.smoothing_weights.len() {
            return Err(DmsError::Config(format!(
                "history_len must be at least {}, got {}",
                self.smoothing_weights.len(),
                self.history_len
            )));
        }

        if !(0.0..=crate::scorer::MAX_SCORE).contains(&self.drowsy_threshold) {
            return Err(DmsError::Config(format!(
                "drowsy_threshold must be within [0, 100], got {}",
                self.drowsy_threshold
            )));
        }

        if self.closed_increment < 0.0 || self.deep_closure_multiplier < 1.0 {
            return Err(DmsError::Config(
                "closed_increment must be >= 0 and deep_closure_multiplier >= 1".into(),
            ));
        }

        if self.processing_width == 0 || self.processing_height == 0 {
            return Err(DmsError::Config("processing size must be non-zero".into()));
        }

        Ok(())
    }
}
