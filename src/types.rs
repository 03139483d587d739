//! Core types for the Motion Insight pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw acceleration samples, derived metrics, detected patterns, and
//! the advisory output returned to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::adapter::deserialize_timestamp;

/// A single triaxial accelerometer reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelerationSample {
    /// When the sample was taken (UTC, millisecond resolution)
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Acceleration along the x axis (normalized units, 1.0 = 1g)
    pub x: f64,
    /// Acceleration along the y axis
    pub y: f64,
    /// Acceleration along the z axis
    pub z: f64,
}

impl AccelerationSample {
    /// Euclidean norm of the three axes
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// A recorded series of accelerometer samples
///
/// Samples are expected in ascending timestamp order; the pipeline never
/// re-sorts them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccelerationData {
    /// Free-form label of the recorded signal (e.g. "acceleration")
    pub data_type: String,
    /// Opaque device description, passed through untouched
    pub device_info: HashMap<String, serde_json::Value>,
    /// Sampling rate in Hz. Only used to turn sample counts into durations.
    pub sampling_rate_hz: i64,
    /// Start of the recording
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start_time: DateTime<Utc>,
    /// Ordered samples
    pub samples: Vec<AccelerationSample>,
    /// Optional caller metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
    /// Optional caller-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Summary activity metrics derived from a sample series
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActivityMetrics {
    /// Mean intensity (0-1)
    pub avg_intensity: f64,
    /// Peak intensity (0-1)
    pub peak_intensity: f64,
    /// Inverse-normalized magnitude variance (0-1, higher = steadier)
    pub movement_consistency: f64,
    /// Estimated active time (minutes)
    pub active_minutes: f64,
    /// Time covered by the samples (minutes)
    pub total_duration: f64,
}

/// A contiguous stretch of samples resting near gravity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InactivityPeriod {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Duration in seconds (end - start)
    pub duration: f64,
}

/// Patterns detected in a sample series
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActivityPatterns {
    /// Chronological, non-overlapping inactivity periods
    pub inactivity_periods: Vec<InactivityPeriod>,
    /// Reserved for future classifiers; always empty today
    #[serde(default)]
    pub activity_patterns: Vec<String>,
}

/// Priority attached to an insight or recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// Category of an insight or recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    ActivityLevel,
    Inactivity,
    Consistency,
    DailyGoal,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::ActivityLevel => "activity_level",
            InsightType::Inactivity => "inactivity",
            InsightType::Consistency => "consistency",
            InsightType::DailyGoal => "daily_goal",
        }
    }
}

/// An observation about the analyzed session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Identifier unique within a response
    pub id: String,
    pub insight_type: InsightType,
    pub message: String,
    pub priority: Priority,
}

/// An actionable suggestion derived from the analyzed session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Identifier unique within a response
    pub id: String,
    pub recommendation_type: InsightType,
    pub title: String,
    pub message: String,
    pub priority: Priority,
}

fn default_true() -> bool {
    true
}

/// A request to analyze one sample series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub acceleration_data: AccelerationData,
    #[serde(default = "default_true")]
    pub include_insights: bool,
    #[serde(default = "default_true")]
    pub include_recommendations: bool,
    pub user_id: String,
}

/// Outcome status of an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Success,
}

/// Result of one analysis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub status: AnalysisStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub insights: Vec<Insight>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    pub metrics: ActivityMetrics,
}
