//! Pipeline orchestration
//!
//! This module provides the public API for Motion Insight.
//! It runs the metrics engine, pattern detector and rule engine over a
//! validated request and assembles the response.

use tracing::debug;

use crate::adapter::parse_request;
use crate::config::AnalysisConfig;
use crate::error::ComputeError;
use crate::insights::InsightEngine;
use crate::metrics::MetricsEngine;
use crate::patterns::PatternDetector;
use crate::types::{AnalysisRequest, AnalysisResponse, AnalysisStatus};

/// Analyze a request JSON string and return response JSON (stateless, one-shot).
///
/// # Arguments
/// * `request_json` - Analysis request JSON
///
/// # Returns
/// Analysis response JSON string
///
/// # Example
/// ```ignore
/// let response_json = analyze_json(request_json)?;
/// ```
pub fn analyze_json(request_json: String) -> Result<String, ComputeError> {
    AnalysisService::new().analyze_json(&request_json)
}

/// Analyze a validated request with the default configuration
pub fn analyze(request: &AnalysisRequest) -> AnalysisResponse {
    AnalysisService::new().analyze(request)
}

/// Analysis service holding the configured engines.
///
/// Holds no per-call state; one instance can serve any number of concurrent
/// callers.
#[derive(Debug, Clone, Default)]
pub struct AnalysisService {
    metrics: MetricsEngine,
    patterns: PatternDetector,
    rules: InsightEngine,
}

impl AnalysisService {
    /// Create a service with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service from a configuration.
    ///
    /// The configuration is validated first; values the engines cannot work
    /// with (such as a zero sensitivity) are rejected.
    pub fn with_config(config: AnalysisConfig) -> Result<Self, ComputeError> {
        config.validate()?;

        Ok(Self {
            metrics: MetricsEngine::new(config.signal.clone()),
            patterns: PatternDetector::new(config.signal),
            rules: InsightEngine::new(config.rules),
        })
    }

    /// Analyze a validated request.
    ///
    /// Metrics and patterns are always computed; insights and recommendations
    /// only when the request asks for them.
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisResponse {
        let data = &request.acceleration_data;

        // Stage 1: Compute metrics
        let metrics = self.metrics.compute(data);

        // Stage 2: Detect patterns
        let patterns = self.patterns.detect(data);

        // Stage 3: Apply rules
        let insights = if request.include_insights {
            self.rules.generate_insights(&metrics, &patterns)
        } else {
            Vec::new()
        };

        let recommendations = if request.include_recommendations {
            self.rules.generate_recommendations(&metrics, &patterns)
        } else {
            Vec::new()
        };

        debug!(
            user_id = %request.user_id,
            samples = data.samples.len(),
            insights = insights.len(),
            recommendations = recommendations.len(),
            "analysis complete"
        );

        AnalysisResponse {
            status: AnalysisStatus::Success,
            message: None,
            insights,
            recommendations,
            metrics,
        }
    }

    /// Parse, validate, analyze and encode in one call
    pub fn analyze_json(&self, request_json: &str) -> Result<String, ComputeError> {
        // Stage 0: Parse and validate
        let request = parse_request(request_json)?;

        let response = self.analyze(&request);

        // Stage 4: Encode
        serde_json::to_string_pretty(&response).map_err(ComputeError::JsonError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        high_activity_data, inactive_data, low_activity_data, request_for, series,
    };
    use crate::types::{ActivityMetrics, InsightType, Priority};
    use pretty_assertions::assert_eq;

    fn strip_ids(response: &AnalysisResponse) -> Vec<(InsightType, String, Priority)> {
        response
            .insights
            .iter()
            .map(|i| (i.insight_type, i.message.clone(), i.priority))
            .chain(
                response
                    .recommendations
                    .iter()
                    .map(|r| (r.recommendation_type, r.message.clone(), r.priority)),
            )
            .collect()
    }

    #[test]
    fn test_analyze_with_insights_and_recommendations() {
        let response = analyze(&request_for(low_activity_data(), true, true));

        assert_eq!(response.status, AnalysisStatus::Success);
        assert!(response.message.is_none());
        assert!(!response.insights.is_empty());
        assert!(!response.recommendations.is_empty());
        assert!(response.metrics.total_duration > 0.0);
    }

    #[test]
    fn test_analyze_without_insights_and_recommendations() {
        let response = analyze(&request_for(low_activity_data(), false, false));

        assert_eq!(response.status, AnalysisStatus::Success);
        assert!(response.insights.is_empty());
        assert!(response.recommendations.is_empty());
        assert!(response.metrics.total_duration > 0.0);
        assert!(response.metrics.avg_intensity > 0.0);
    }

    #[test]
    fn test_flags_are_independent() {
        let insights_only = analyze(&request_for(low_activity_data(), true, false));
        assert!(!insights_only.insights.is_empty());
        assert!(insights_only.recommendations.is_empty());

        let recommendations_only = analyze(&request_for(low_activity_data(), false, true));
        assert!(recommendations_only.insights.is_empty());
        assert!(!recommendations_only.recommendations.is_empty());
    }

    #[test]
    fn test_analyze_with_active_data() {
        let response = analyze(&request_for(high_activity_data(), true, true));

        assert!(response.metrics.avg_intensity > 0.3);
        let activity = response
            .insights
            .iter()
            .find(|i| i.insight_type == InsightType::ActivityLevel)
            .unwrap();
        assert_eq!(activity.priority, Priority::High);
    }

    #[test]
    fn test_analyze_with_inactive_data() {
        let response = analyze(&request_for(inactive_data(), true, true));

        assert!(response
            .insights
            .iter()
            .any(|i| i.insight_type == InsightType::Inactivity));
        assert!(response
            .recommendations
            .iter()
            .any(|r| r.recommendation_type == InsightType::Inactivity));
    }

    #[test]
    fn test_low_activity_falls_in_general_band() {
        // Average intensity of this fixture sits between 0.2 and 0.3
        let response = analyze(&request_for(low_activity_data(), true, true));

        let activity = &response.insights[0];
        assert_eq!(activity.insight_type, InsightType::ActivityLevel);
        assert_eq!(activity.priority, Priority::Low);
        assert_eq!(
            response.recommendations[0].title,
            "Optimize Your Movement Patterns"
        );
    }

    #[test]
    fn test_empty_series() {
        let response = analyze(&request_for(series(0, |_| (0.0, 0.0, 1.0)), true, true));

        assert_eq!(response.metrics, ActivityMetrics::default());
        // Zero intensity still gets the low-activity messages
        assert_eq!(response.insights.len(), 1);
        assert_eq!(response.insights[0].priority, Priority::Medium);
        assert_eq!(response.recommendations[0].title, "Increase Your Movement");
    }

    #[test]
    fn test_idempotent_apart_from_ids() {
        let request = request_for(inactive_data(), true, true);
        let first = analyze(&request);
        let second = analyze(&request);

        assert_eq!(first.metrics, second.metrics);
        assert_eq!(strip_ids(&first), strip_ids(&second));
        assert_ne!(first.insights[0].id, second.insights[0].id);
    }

    #[test]
    fn test_concurrent_invocations() {
        let service = AnalysisService::new();
        let request = request_for(high_activity_data(), true, true);
        let expected = service.analyze(&request);
        let (service, request) = (&service, &request);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(move || service.analyze(request)))
                .collect();

            for handle in handles {
                let response = handle.join().unwrap();
                assert_eq!(response.metrics, expected.metrics);
                assert_eq!(strip_ids(&response), strip_ids(&expected));
            }
        });
    }

    #[test]
    fn test_custom_config() {
        let mut config = AnalysisConfig::default();
        config.rules.low_intensity = 0.5;
        let service = AnalysisService::with_config(config).unwrap();

        // Intensity ~0.21 is now below the low threshold
        let response = service.analyze(&request_for(low_activity_data(), true, false));
        assert_eq!(response.insights[0].priority, Priority::Medium);
        assert!(response.insights[0].message.contains("quite low"));
    }

    #[test]
    fn test_with_config_rejects_invalid_config() {
        let mut config = AnalysisConfig::default();
        config.signal.intensity_sensitivity = 0.0;

        let result = AnalysisService::with_config(config);
        assert!(matches!(result, Err(ComputeError::InvalidConfig(_))));
    }

    #[test]
    fn test_analyze_json_round_trip() {
        let request = request_for(inactive_data(), true, true);
        let json = serde_json::to_string(&request).unwrap();

        let output = analyze_json(json).unwrap();
        let payload: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(payload["status"], "success");
        assert!(payload["metrics"]["avg_intensity"].is_number());
        assert!(payload["insights"].is_array());
        assert_eq!(payload["insights"][0]["insight_type"], "activity_level");
        assert!(payload["recommendations"]
            .as_array()
            .unwrap()
            .iter()
            .any(|r| r["recommendation_type"] == "inactivity" && r["priority"] == "high"));
    }

    #[test]
    fn test_analyze_json_rejects_invalid_input() {
        assert!(analyze_json("not valid json".to_string()).is_err());

        let mut request = request_for(low_activity_data(), true, true);
        request.acceleration_data.sampling_rate_hz = 0;
        let json = serde_json::to_string(&request).unwrap();
        assert!(matches!(
            analyze_json(json),
            Err(ComputeError::InvalidSamplingRate(0))
        ));
    }
}
