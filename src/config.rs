//! Analysis configuration
//!
//! Every constant the pipeline uses lives here. The defaults are the values the
//! engines were calibrated with; a partial JSON document overrides only the
//! fields it names.

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;

/// Signal-processing constants used by the metrics engine and pattern detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Expected magnitude of a device at rest (1.0 = 1g)
    pub gravity_offset: f64,
    /// Deviation from gravity that maps to full intensity.
    /// Moderate deviations saturate near 1.0 with the default of 0.5.
    pub intensity_sensitivity: f64,
    /// Magnitude variance that maps to zero consistency
    pub variance_scale: f64,
    /// Rolling mean above `gravity_offset + active_threshold` counts as active
    pub active_threshold: f64,
    /// Maximum rolling window length (samples) for active time
    pub active_window: usize,
    /// Deviation from gravity below which a sample is inactive
    pub inactivity_threshold: f64,
    /// Series shorter than this are not segmented
    pub min_pattern_samples: usize,
    /// Upper bound on the run length required for an inactivity period
    pub max_inactivity_run: usize,
    /// Run length requirement is also capped at `sample_count / divisor`
    pub inactivity_run_divisor: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            gravity_offset: 1.0,
            intensity_sensitivity: 0.5,
            variance_scale: 2.0,
            active_threshold: 0.2,
            active_window: 10,
            inactivity_threshold: 0.1,
            min_pattern_samples: 10,
            max_inactivity_run: 20,
            inactivity_run_divisor: 5,
        }
    }
}

/// Thresholds for the insight and recommendation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    /// Average intensity below this is low activity
    pub low_intensity: f64,
    /// Average intensity above this is high activity
    pub high_intensity: f64,
    /// Average intensity above this (and not high) is good activity
    pub good_intensity: f64,
    /// Consistency above this is very consistent
    pub consistent_movement: f64,
    /// Consistency below this is highly variable
    pub variable_movement: f64,
    /// Consistency rules need a session longer than this (minutes)
    pub min_consistency_minutes: f64,
    /// The small-goal recommendation needs a session longer than this (minutes)
    pub goal_min_session_minutes: f64,
    /// Active minutes below this trigger the small-goal recommendation
    pub low_active_minutes: f64,
    /// Active minutes above this meet the activity goal
    pub goal_active_minutes: f64,
    /// More inactivity periods than this raise the insight priority to high
    pub many_inactivity_periods: usize,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            low_intensity: 0.2,
            high_intensity: 0.7,
            good_intensity: 0.3,
            consistent_movement: 0.7,
            variable_movement: 0.3,
            min_consistency_minutes: 5.0,
            goal_min_session_minutes: 10.0,
            low_active_minutes: 5.0,
            goal_active_minutes: 20.0,
            many_inactivity_periods: 3,
        }
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub signal: SignalConfig,
    pub rules: RuleThresholds,
}

impl AnalysisConfig {
    /// Parse a configuration document and validate it
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let config: AnalysisConfig = serde_json::from_str(json)
            .map_err(|e| ComputeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON
    pub fn to_json(&self) -> Result<String, ComputeError> {
        serde_json::to_string_pretty(self).map_err(|e| ComputeError::EncodingError(e.to_string()))
    }

    /// Reject values the engines cannot work with
    pub fn validate(&self) -> Result<(), ComputeError> {
        let signal = &self.signal;
        let rules = &self.rules;

        let finite = [
            ("signal.gravity_offset", signal.gravity_offset),
            ("signal.intensity_sensitivity", signal.intensity_sensitivity),
            ("signal.variance_scale", signal.variance_scale),
            ("signal.active_threshold", signal.active_threshold),
            ("signal.inactivity_threshold", signal.inactivity_threshold),
            ("rules.low_intensity", rules.low_intensity),
            ("rules.high_intensity", rules.high_intensity),
            ("rules.good_intensity", rules.good_intensity),
            ("rules.consistent_movement", rules.consistent_movement),
            ("rules.variable_movement", rules.variable_movement),
            ("rules.min_consistency_minutes", rules.min_consistency_minutes),
            ("rules.goal_min_session_minutes", rules.goal_min_session_minutes),
            ("rules.low_active_minutes", rules.low_active_minutes),
            ("rules.goal_active_minutes", rules.goal_active_minutes),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ComputeError::InvalidConfig(format!("{name} must be finite")));
        }

        if signal.intensity_sensitivity <= 0.0 {
            return Err(ComputeError::InvalidConfig(
                "signal.intensity_sensitivity must be positive".to_string(),
            ));
        }
        if signal.variance_scale <= 0.0 {
            return Err(ComputeError::InvalidConfig(
                "signal.variance_scale must be positive".to_string(),
            ));
        }
        if signal.active_window == 0 {
            return Err(ComputeError::InvalidConfig(
                "signal.active_window must be at least 1".to_string(),
            ));
        }
        if signal.inactivity_run_divisor == 0 {
            return Err(ComputeError::InvalidConfig(
                "signal.inactivity_run_divisor must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
