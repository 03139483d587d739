//! Motion Insight - Activity analysis for triaxial accelerometer data
//!
//! Motion Insight turns an ordered series of accelerometer samples into activity
//! metrics, inactivity periods and rule-based advice through a deterministic
//! pipeline: request validation → metrics → pattern detection → rules.
//!
//! ## Modules
//!
//! - **Metrics**: intensity, consistency, duration and active time
//! - **Patterns**: inactivity segmentation
//! - **Insights**: threshold rules producing insights and recommendations
//! - **Pipeline**: orchestration and the JSON entry point

pub mod adapter;
pub mod config;
pub mod error;
pub mod insights;
pub mod metrics;
pub mod patterns;
pub mod pipeline;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

#[cfg(test)]
mod test_support;

pub use adapter::{parse_request, validate_request};
pub use config::{AnalysisConfig, RuleThresholds, SignalConfig};
pub use error::ComputeError;
pub use insights::{generate_insights, generate_recommendations, InsightEngine};
pub use metrics::{compute_activity_metrics, MetricsEngine};
pub use patterns::{detect_activity_patterns, PatternDetector};
pub use pipeline::{analyze, analyze_json, AnalysisService};

/// Library version reported by the CLI and FFI
pub const MOTION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported by the CLI
pub const PRODUCER_NAME: &str = "motion-insight";
