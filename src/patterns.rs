//! Inactivity pattern detection
//!
//! Segments a sample series into maximal runs of samples that either rest near
//! gravity or do not, and reports the resting runs long enough to matter.

use std::ops::Range;

use tracing::debug;

use crate::config::SignalConfig;
use crate::types::{AccelerationData, AccelerationSample, ActivityPatterns, InactivityPeriod};

/// A maximal run of samples sharing the same inactive flag
#[derive(Debug, Clone, PartialEq, Eq)]
struct StateRun {
    range: Range<usize>,
    inactive: bool,
}

impl StateRun {
    fn len(&self) -> usize {
        self.range.len()
    }
}

/// Pattern detector for inactivity periods
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    config: SignalConfig,
}

impl PatternDetector {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    /// Detect inactivity periods in a sample series.
    ///
    /// Series shorter than `min_pattern_samples` produce no periods.
    pub fn detect(&self, data: &AccelerationData) -> ActivityPatterns {
        let samples = &data.samples;
        if samples.len() < self.config.min_pattern_samples {
            debug!(
                samples = samples.len(),
                "too few samples for pattern detection"
            );
            return ActivityPatterns::default();
        }

        let inactive: Vec<bool> = samples.iter().map(|s| self.is_inactive(s)).collect();

        let min_run = self.min_run_length(samples.len());

        let inactivity_periods: Vec<InactivityPeriod> = state_runs(&inactive)
            .into_iter()
            .filter(|run| run.inactive && run.len() >= min_run)
            .map(|run| period_for(&samples[run.range]))
            .collect();

        debug!(
            samples = samples.len(),
            min_run,
            periods = inactivity_periods.len(),
            "detected inactivity periods"
        );

        ActivityPatterns {
            inactivity_periods,
            activity_patterns: Vec::new(),
        }
    }

    fn is_inactive(&self, sample: &AccelerationSample) -> bool {
        let deviation = (sample.magnitude() - self.config.gravity_offset).abs();
        deviation < self.config.inactivity_threshold
    }

    /// Minimum run length for a reported period: `min(max_run, len / divisor)`.
    /// A zero result lets any inactive run qualify.
    fn min_run_length(&self, sample_count: usize) -> usize {
        (sample_count / self.config.inactivity_run_divisor.max(1))
            .min(self.config.max_inactivity_run)
    }
}

/// Detect patterns with the default configuration
pub fn detect_activity_patterns(data: &AccelerationData) -> ActivityPatterns {
    PatternDetector::default().detect(data)
}

/// Split flags into maximal runs; a new run starts wherever the flag changes
fn state_runs(flags: &[bool]) -> Vec<StateRun> {
    let mut runs: Vec<StateRun> = Vec::new();

    for (i, &flag) in flags.iter().enumerate() {
        match runs.last_mut() {
            Some(run) if run.inactive == flag => run.range.end = i + 1,
            _ => runs.push(StateRun {
                range: i..i + 1,
                inactive: flag,
            }),
        }
    }

    runs
}

fn period_for(run: &[AccelerationSample]) -> InactivityPeriod {
    let start_time = run.iter().map(|s| s.timestamp).min().unwrap_or_default();
    let end_time = run.iter().map(|s| s.timestamp).max().unwrap_or(start_time);
    let duration = (end_time - start_time).num_milliseconds() as f64 / 1000.0;

    InactivityPeriod {
        start_time,
        end_time,
        duration,
    }
}
