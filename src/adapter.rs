//! Analysis request adapter
//!
//! Parses request JSON and validates it before anything reaches the analysis
//! core. Malformed input never gets past this module.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::ComputeError;
use crate::types::{AccelerationData, AnalysisRequest};

/// Naive timestamp layouts accepted in addition to RFC 3339, read as UTC
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse and validate an analysis request JSON string
pub fn parse_request(json: &str) -> Result<AnalysisRequest, ComputeError> {
    let request: AnalysisRequest = serde_json::from_str(json)
        .map_err(|e| ComputeError::ParseError(format!("Failed to parse analysis request: {}", e)))?;
    validate_request(&request)?;
    Ok(request)
}

/// Check an already-deserialized request
pub fn validate_request(request: &AnalysisRequest) -> Result<(), ComputeError> {
    if request.user_id.trim().is_empty() {
        return Err(ComputeError::MissingField("user_id".to_string()));
    }
    validate_data(&request.acceleration_data)
}

/// Check sampling rate and sample values
pub fn validate_data(data: &AccelerationData) -> Result<(), ComputeError> {
    if data.sampling_rate_hz < 1 {
        return Err(ComputeError::InvalidSamplingRate(data.sampling_rate_hz));
    }

    for (index, sample) in data.samples.iter().enumerate() {
        let axes = [("x", sample.x), ("y", sample.y), ("z", sample.z)];
        if let Some((axis, value)) = axes.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ComputeError::InvalidSample {
                index,
                reason: format!("{axis} is not a finite number ({value})"),
            });
        }
        if !sample.magnitude().is_finite() {
            return Err(ComputeError::InvalidSample {
                index,
                reason: "magnitude overflows".to_string(),
            });
        }
    }

    Ok(())
}

/// Parse an RFC 3339 timestamp, falling back to naive ISO 8601 read as UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ComputeError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| ComputeError::ParseError(format!("Invalid timestamp: {value}")))
}

/// Serde hook for timestamp fields
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{base_time, low_activity_data, request_for};
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn sample_request_json() -> &'static str {
        r#"{
            "acceleration_data": {
                "data_type": "acceleration",
                "device_info": {"device": "watch", "firmware": 3},
                "sampling_rate_hz": 10,
                "start_time": "2024-01-15T10:00:00Z",
                "samples": [
                    {"timestamp": "2024-01-15T10:00:00.000Z", "x": 0.0, "y": 0.0, "z": 1.0},
                    {"timestamp": "2024-01-15T10:00:00.100Z", "x": 0.1, "y": 0.0, "z": 1.0},
                    {"timestamp": "2024-01-15T11:00:00.200+01:00", "x": 0.0, "y": 0.2, "z": 0.9}
                ],
                "id": "data-1"
            },
            "include_insights": true,
            "include_recommendations": false,
            "user_id": "user-1"
        }"#
    }

    #[test]
    fn test_parse_valid_request() {
        let request = parse_request(sample_request_json()).unwrap();

        assert_eq!(request.user_id, "user-1");
        assert!(request.include_insights);
        assert!(!request.include_recommendations);

        let data = &request.acceleration_data;
        assert_eq!(data.sampling_rate_hz, 10);
        assert_eq!(data.samples.len(), 3);
        assert_eq!(data.id.as_deref(), Some("data-1"));
        assert_eq!(data.device_info["firmware"], 3);
        // Offset timestamps are normalized to UTC
        assert_eq!(
            data.samples[2].timestamp,
            base_time() + Duration::milliseconds(200)
        );
    }

    #[test]
    fn test_parse_naive_timestamp() {
        let parsed = parse_timestamp("2024-01-15T10:00:00.250").unwrap();
        assert_eq!(parsed, base_time() + Duration::milliseconds(250));

        let spaced = parse_timestamp("2024-01-15 10:00:00.5").unwrap();
        assert_eq!(spaced, base_time() + Duration::milliseconds(500));
    }

    #[test]
    fn test_invalid_timestamp() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_missing_fields_rejected() {
        let json = r#"{"acceleration_data": {}, "user_id": "user-1"}"#;
        let result = parse_request(json);
        assert!(matches!(result, Err(ComputeError::ParseError(_))));
    }

    #[test]
    fn test_missing_user_id_rejected() {
        let json = sample_request_json().replace(r#""user_id": "user-1""#, r#""other": 1"#);
        let err = parse_request(&json).unwrap_err();
        assert!(err.to_string().contains("user_id"));
    }

    #[test]
    fn test_wrong_numeric_type_rejected() {
        let json = sample_request_json().replace(r#""x": 0.1"#, r#""x": "fast""#);
        assert!(parse_request(&json).is_err());
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse_request("not valid json").is_err());
    }

    #[test]
    fn test_blank_user_id_rejected() {
        let json = sample_request_json().replace(r#""user-1""#, r#""  ""#);
        let result = parse_request(&json);
        assert!(matches!(result, Err(ComputeError::MissingField(field)) if field == "user_id"));
    }

    #[test]
    fn test_zero_sampling_rate_rejected() {
        let json = sample_request_json().replace(r#""sampling_rate_hz": 10"#, r#""sampling_rate_hz": 0"#);
        let result = parse_request(&json);
        assert!(matches!(result, Err(ComputeError::InvalidSamplingRate(0))));
    }

    #[test]
    fn test_non_finite_sample_rejected() {
        let mut request = request_for(low_activity_data(), true, true);
        request.acceleration_data.samples[7].y = f64::NAN;

        let result = validate_request(&request);
        assert!(matches!(result, Err(ComputeError::InvalidSample { index: 7, .. })));
    }

    #[test]
    fn test_overflowing_magnitude_rejected() {
        let mut request = request_for(low_activity_data(), true, true);
        request.acceleration_data.samples[3].x = 1e200;

        let result = validate_request(&request);
        assert!(matches!(
            result,
            Err(ComputeError::InvalidSample { index: 3, reason }) if reason.contains("magnitude")
        ));
    }

    #[test]
    fn test_valid_fixture_passes() {
        let request = request_for(low_activity_data(), true, true);
        assert!(validate_request(&request).is_ok());
    }
}
