//! Synthetic accelerometer series shared by the unit tests

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;

use crate::types::{AccelerationData, AccelerationSample, AnalysisRequest};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
}

/// Build a series of `count` samples spaced `step_ms` apart
pub fn series_with_step<F>(count: usize, step_ms: i64, rate_hz: i64, axes: F) -> AccelerationData
where
    F: Fn(usize) -> (f64, f64, f64),
{
    let start = base_time();
    let samples = (0..count)
        .map(|i| {
            let (x, y, z) = axes(i);
            AccelerationSample {
                timestamp: start + Duration::milliseconds(i as i64 * step_ms),
                x,
                y,
                z,
            }
        })
        .collect();

    let mut device_info = HashMap::new();
    device_info.insert("device".to_string(), serde_json::Value::from("test"));
    device_info.insert("model".to_string(), serde_json::Value::from("unit-test"));

    AccelerationData {
        data_type: "acceleration".to_string(),
        device_info,
        sampling_rate_hz: rate_hz,
        start_time: start,
        samples,
        metadata: None,
        id: Some("test-data".to_string()),
    }
}

/// 10 Hz series (100 ms spacing)
pub fn series<F>(count: usize, axes: F) -> AccelerationData
where
    F: Fn(usize) -> (f64, f64, f64),
{
    series_with_step(count, 100, 10, axes)
}

/// Mostly gravity with small wobble on every axis
pub fn low_activity_data() -> AccelerationData {
    series(100, |i| {
        (
            0.1 * (i % 5) as f64,
            0.2 * ((i / 10) % 3) as f64,
            0.9 + 0.05 * (i % 7) as f64,
        )
    })
}

/// Large oscillation on all axes
pub fn high_activity_data() -> AccelerationData {
    series(100, |i| {
        let t = i as f64;
        (
            2.0 * (0.1 * t).sin(),
            1.5 * (0.1 * t).cos(),
            1.0 + 0.8 * (0.05 * t).sin(),
        )
    })
}

/// Moderate oscillation that stays well away from gravity most of the time
pub fn moderate_activity_data() -> AccelerationData {
    series(100, |i| {
        let t = i as f64;
        (
            0.8 * (0.1 * t).sin(),
            0.7 * (0.1 * t).cos(),
            0.6 + 0.5 * (0.05 * t).sin(),
        )
    })
}

/// Long resting stretches with a short burst of movement in between
pub fn inactive_data() -> AccelerationData {
    series(100, |i| {
        let t = i as f64;
        if i < 30 || (i > 60 && i < 90) {
            (
                0.01 * (0.1 * t).sin(),
                0.01 * (0.1 * t).cos(),
                1.0 + 0.01 * (0.05 * t).sin(),
            )
        } else {
            (
                0.3 * (0.1 * t).sin(),
                0.2 * (0.1 * t).cos(),
                0.9 + 0.1 * (0.05 * t).sin(),
            )
        }
    })
}

/// Device lying still on the z axis, or moving at 1.5g outside `rest`
pub fn resting_between(count: usize, rest: std::ops::Range<usize>) -> AccelerationData {
    series(count, move |i| {
        if rest.contains(&i) {
            (0.0, 0.0, 1.0 + 0.01 * (i as f64).sin())
        } else {
            (0.0, 0.0, 1.5)
        }
    })
}

pub fn request_for(data: AccelerationData, insights: bool, recommendations: bool) -> AnalysisRequest {
    AnalysisRequest {
        acceleration_data: data,
        include_insights: insights,
        include_recommendations: recommendations,
        user_id: "test-user-1".to_string(),
    }
}
