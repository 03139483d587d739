//! Activity metrics
//!
//! This module derives summary metrics from a series of accelerometer samples:
//! - Average and peak intensity (deviation of magnitude from gravity)
//! - Movement consistency (inverse-normalized magnitude variance)
//! - Session duration
//! - Active minutes from a trailing rolling mean of magnitude

use tracing::{debug, warn};

use crate::config::SignalConfig;
use crate::types::{AccelerationData, AccelerationSample, ActivityMetrics};

/// Metrics engine for computing activity metrics
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: SignalConfig,
}

impl MetricsEngine {
    /// Create an engine. `config` is expected to pass `AnalysisConfig::validate`;
    /// a non-positive sensitivity or variance scale yields meaningless metrics.
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    /// Compute metrics for a sample series.
    ///
    /// An empty series yields all-zero metrics.
    pub fn compute(&self, data: &AccelerationData) -> ActivityMetrics {
        let samples = &data.samples;
        if samples.is_empty() {
            return ActivityMetrics::default();
        }

        let magnitudes = magnitudes(samples);
        let avg_magnitude = magnitudes.iter().sum::<f64>() / magnitudes.len() as f64;
        let max_magnitude = magnitudes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let avg_intensity = self.intensity(avg_magnitude);
        let peak_intensity = self.intensity(max_magnitude);
        let movement_consistency =
            compute_movement_consistency(&magnitudes, self.config.variance_scale);
        let total_duration = compute_total_duration(samples);

        let active_samples = count_active_samples(
            &magnitudes,
            self.config.active_window,
            self.config.gravity_offset + self.config.active_threshold,
        );
        let active_minutes = compute_active_minutes(active_samples, data.sampling_rate_hz);

        debug!(
            samples = samples.len(),
            avg_intensity,
            peak_intensity,
            movement_consistency,
            active_minutes,
            total_duration,
            "computed activity metrics"
        );

        ActivityMetrics {
            avg_intensity,
            peak_intensity,
            movement_consistency,
            active_minutes,
            total_duration,
        }
    }

    /// Map a magnitude to intensity: `(magnitude - gravity) / sensitivity`, clamped to 0-1
    fn intensity(&self, magnitude: f64) -> f64 {
        ((magnitude - self.config.gravity_offset) / self.config.intensity_sensitivity)
            .clamp(0.0, 1.0)
    }
}

/// Compute metrics with the default configuration
pub fn compute_activity_metrics(data: &AccelerationData) -> ActivityMetrics {
    MetricsEngine::default().compute(data)
}

pub(crate) fn magnitudes(samples: &[AccelerationSample]) -> Vec<f64> {
    samples.iter().map(AccelerationSample::magnitude).collect()
}

/// Sample variance (n - 1 denominator). A single value has zero variance.
fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
}

/// Movement consistency
///
/// Formula: `1 - min(variance / variance_scale, 1)`. An undefined variance
/// (overflowing magnitudes) counts as fully inconsistent.
fn compute_movement_consistency(magnitudes: &[f64], variance_scale: f64) -> f64 {
    // f64::min drops NaN, so a NaN ratio becomes 1 and consistency 0
    (1.0 - (sample_variance(magnitudes) / variance_scale).min(1.0)).max(0.0)
}

/// Span between earliest and latest sample, in minutes.
///
/// Uses min/max rather than first/last so unordered input stays correct.
fn compute_total_duration(samples: &[AccelerationSample]) -> f64 {
    let earliest = samples.iter().map(|s| s.timestamp).min();
    let latest = samples.iter().map(|s| s.timestamp).max();

    match (earliest, latest) {
        (Some(start), Some(end)) => (end - start).num_milliseconds() as f64 / 1000.0 / 60.0,
        _ => 0.0,
    }
}

/// Count samples whose trailing rolling mean exceeds `threshold`.
///
/// The window is `min(window_cap, len)` samples ending at each index; the first
/// positions average over however many samples exist so far.
fn count_active_samples(magnitudes: &[f64], window_cap: usize, threshold: f64) -> usize {
    let window = window_cap.min(magnitudes.len()).max(1);
    let mut running_sum = 0.0;
    let mut active = 0;

    for (i, magnitude) in magnitudes.iter().enumerate() {
        running_sum += magnitude;
        if i >= window {
            running_sum -= magnitudes[i - window];
        }

        let filled = (i + 1).min(window);
        // inf - inf leaves NaN behind; rebuild from the current window instead
        if !running_sum.is_finite() {
            running_sum = magnitudes[i + 1 - filled..=i].iter().sum();
        }

        if running_sum / filled as f64 > threshold {
            active += 1;
        }
    }

    active
}

/// Convert an active sample count to minutes. Non-positive rates count as 1 Hz.
fn compute_active_minutes(active_samples: usize, sampling_rate_hz: i64) -> f64 {
    let rate = if sampling_rate_hz < 1 {
        warn!(sampling_rate_hz, "non-positive sampling rate, assuming 1 Hz");
        1
    } else {
        sampling_rate_hz
    };

    let seconds_per_sample = 1.0 / rate as f64;
    active_samples as f64 * seconds_per_sample / 60.0
}
