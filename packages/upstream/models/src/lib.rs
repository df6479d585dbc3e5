#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Wire types for the UCR prediction service and FBI Crime Data Explorer.
//!
//! The upstream services have drifted between field names over time
//! (`lower` vs `lower_bound`, `metadata` vs `model_info`, ...), so every
//! value is extracted through an explicit ordered list of candidate keys,
//! evaluated once at parse time.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Candidate keys for the date of a prediction or history point.
const DATE_KEYS: &[&str] = &["date", "month"];
/// Candidate keys for the lower confidence bound.
const LOWER_KEYS: &[&str] = &["lower", "lower_bound"];
/// Candidate keys for the upper confidence bound.
const UPPER_KEYS: &[&str] = &["upper", "upper_bound"];
/// Candidate keys for the actual incident count in a history point.
const ACTUAL_KEYS: &[&str] = &["actual", "incidents", "value"];
/// Candidate keys for the prediction series in a predict response.
const PREDICTIONS_KEYS: &[&str] = &["predictions", "forecast"];
/// Candidate keys for the model metadata block in a predict response.
const METADATA_KEYS: &[&str] = &["metadata", "model", "model_info"];
/// Candidate keys for the history series in a history response.
const HISTORY_KEYS: &[&str] = &["history", "data"];
/// Candidate keys for the model type name.
const MODEL_TYPE_KEYS: &[&str] = &["model_type", "model"];
/// Candidate keys for the model error rate.
const MAPE_KEYS: &[&str] = &["mape", "error_rate"];
/// Candidate keys for the end of the model's training data.
const TRAINING_END_KEYS: &[&str] = &["training_end", "data_through"];

/// Returns the first present value among `keys`, if any.
fn first_value<'v>(value: &'v Value, keys: &[&str]) -> Option<&'v Value> {
    keys.iter().find_map(|key| value.get(key))
}

fn first_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    first_value(value, keys).and_then(Value::as_f64)
}

fn first_i64(value: &Value, keys: &[&str]) -> Option<i64> {
    first_value(value, keys).and_then(Value::as_i64)
}

fn first_str<'v>(value: &'v Value, keys: &[&str]) -> Option<&'v str> {
    first_value(value, keys).and_then(Value::as_str)
}

/// One forecasted month with its confidence interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    /// Month in `YYYY-MM` form.
    pub date: String,
    /// Predicted incident count.
    pub predicted: f64,
    /// Lower confidence bound.
    pub lower: f64,
    /// Upper confidence bound.
    pub upper: f64,
}

impl PredictionPoint {
    /// Extracts a prediction point from a raw JSON object, falling back to
    /// zero for any missing numeric field.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        Self {
            date: first_str(value, DATE_KEYS).unwrap_or_default().to_string(),
            predicted: first_f64(value, &["predicted"]).unwrap_or(0.0),
            lower: first_f64(value, LOWER_KEYS).unwrap_or(0.0),
            upper: first_f64(value, UPPER_KEYS).unwrap_or(0.0),
        }
    }
}

/// One observed month of historical data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Month in `YYYY-MM` form.
    pub date: String,
    /// Reported incident count.
    pub actual: i64,
    /// Rate per 100,000 population, when the source provides it.
    pub rate: Option<f64>,
}

impl HistoryPoint {
    /// Extracts a history point from a raw JSON object.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_json(value: &Value) -> Self {
        Self {
            date: first_str(value, DATE_KEYS).unwrap_or_default().to_string(),
            actual: first_i64(value, ACTUAL_KEYS)
                .or_else(|| first_f64(value, ACTUAL_KEYS).map(|v| v.round() as i64))
                .unwrap_or(0),
            rate: first_f64(value, &["rate"]),
        }
    }
}

/// Metadata about the model that produced a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model algorithm name (e.g. `"ARIMA"`, `"SARIMA"`, `"Prophet"`).
    pub model_type: String,
    /// Mean absolute percentage error, 0-100.
    pub mape: f64,
    /// Last month of training data, `YYYY-MM`.
    pub training_end: String,
    /// Opaque model parameters (e.g. ARIMA orders).
    pub parameters: Value,
}

impl ModelMetadata {
    /// Extracts model metadata from a raw JSON object.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        Self {
            model_type: first_str(value, MODEL_TYPE_KEYS)
                .unwrap_or("Unknown")
                .to_string(),
            mape: first_f64(value, MAPE_KEYS).unwrap_or(0.0),
            training_end: first_str(value, TRAINING_END_KEYS)
                .unwrap_or_default()
                .to_string(),
            parameters: value.get("parameters").cloned().unwrap_or(Value::Null),
        }
    }

    /// Model accuracy, derived as `100 - MAPE`.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        100.0 - self.mape
    }

    /// Whether the model carries a seasonal parameter block.
    #[must_use]
    pub fn is_seasonal(&self) -> bool {
        self.parameters
            .get("seasonal_order")
            .is_some_and(|v| !v.is_null())
    }
}

/// Parsed response from `POST /api/v1/predict/{offense}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Forecasted months, ordered by date, length = requested horizon.
    pub predictions: Vec<PredictionPoint>,
    /// Metadata about the model that produced the forecast.
    pub metadata: ModelMetadata,
    /// Optional model explanation block, passed through to detailed output.
    pub explanation: Option<Value>,
}

impl PredictionResponse {
    /// Parses a predict response body.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let predictions = first_value(value, PREDICTIONS_KEYS)
            .and_then(Value::as_array)
            .map(|points| points.iter().map(PredictionPoint::from_json).collect())
            .unwrap_or_default();

        let metadata = first_value(value, METADATA_KEYS)
            .map_or_else(|| ModelMetadata::from_json(&Value::Null), ModelMetadata::from_json);

        Self {
            predictions,
            metadata,
            explanation: value.get("explanation").cloned(),
        }
    }

    /// The predicted count of the final month in the horizon, or zero when
    /// the series is empty.
    #[must_use]
    pub fn final_predicted(&self) -> f64 {
        self.predictions.last().map_or(0.0, |p| p.predicted)
    }
}

/// Parses a history response body into points.
///
/// The endpoint has returned both a bare array and an object wrapping the
/// series under `history` or `data`.
#[must_use]
pub fn history_points(value: &Value) -> Vec<HistoryPoint> {
    let series = if value.is_array() {
        Some(value)
    } else {
        first_value(value, HISTORY_KEYS)
    };

    series
        .and_then(Value::as_array)
        .map(|points| points.iter().map(HistoryPoint::from_json).collect())
        .unwrap_or_default()
}

/// One entry in the `/api/v1/models` catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Canonical offense name this model covers.
    pub offense: String,
    /// `"national"` or a 2-letter state code.
    pub location: String,
    /// Model metadata (type, accuracy, training window, parameters).
    #[serde(flatten)]
    pub metadata: ModelMetadata,
}

impl ModelInfo {
    /// Extracts a catalog entry from a raw JSON object.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        Self {
            offense: first_str(value, &["offense"]).unwrap_or("unknown").to_string(),
            location: first_str(value, &["location"])
                .unwrap_or("national")
                .to_string(),
            metadata: ModelMetadata::from_json(value),
        }
    }
}

/// Parses a `/api/v1/models` response body into catalog entries.
#[must_use]
pub fn model_catalog(value: &Value) -> Vec<ModelInfo> {
    value
        .get("models")
        .and_then(Value::as_array)
        .map(|models| models.iter().map(ModelInfo::from_json).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prediction_point_primary_keys() {
        let point = PredictionPoint::from_json(&json!({
            "date": "2025-01",
            "predicted": 1200.5,
            "lower": 1100,
            "upper": 1300,
        }));
        assert_eq!(point.date, "2025-01");
        assert!((point.predicted - 1200.5).abs() < f64::EPSILON);
        assert!((point.lower - 1100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn prediction_point_legacy_keys() {
        let point = PredictionPoint::from_json(&json!({
            "month": "2025-02",
            "predicted": 900,
            "lower_bound": 800,
            "upper_bound": 1000,
        }));
        assert_eq!(point.date, "2025-02");
        assert!((point.lower - 800.0).abs() < f64::EPSILON);
        assert!((point.upper - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn history_point_actual_fallbacks() {
        let primary = HistoryPoint::from_json(&json!({"date": "2024-11", "actual": 70_000}));
        assert_eq!(primary.actual, 70_000);

        let legacy = HistoryPoint::from_json(&json!({"date": "2024-11", "incidents": 500}));
        assert_eq!(legacy.actual, 500);

        let oldest = HistoryPoint::from_json(&json!({"date": "2024-11", "value": 7}));
        assert_eq!(oldest.actual, 7);

        let missing = HistoryPoint::from_json(&json!({"date": "2024-11"}));
        assert_eq!(missing.actual, 0);
        assert_eq!(missing.rate, None);
    }

    #[test]
    fn predict_response_metadata_fallbacks() {
        let response = PredictionResponse::from_json(&json!({
            "forecast": [{"date": "2025-01", "predicted": 10}],
            "model_info": {"model": "ARIMA", "error_rate": 8.5, "data_through": "2024-10"},
        }));
        assert_eq!(response.predictions.len(), 1);
        assert_eq!(response.metadata.model_type, "ARIMA");
        assert!((response.metadata.mape - 8.5).abs() < f64::EPSILON);
        assert_eq!(response.metadata.training_end, "2024-10");
        assert!((response.metadata.accuracy() - 91.5).abs() < f64::EPSILON);
    }

    #[test]
    fn predict_response_empty_body() {
        let response = PredictionResponse::from_json(&json!({}));
        assert!(response.predictions.is_empty());
        assert_eq!(response.metadata.model_type, "Unknown");
        assert!((response.final_predicted()).abs() < f64::EPSILON);
    }

    #[test]
    fn history_points_wrapped_and_bare() {
        let wrapped = history_points(&json!({"history": [{"date": "2024-01", "actual": 5}]}));
        assert_eq!(wrapped.len(), 1);

        let data_key = history_points(&json!({"data": [{"date": "2024-01", "actual": 5}]}));
        assert_eq!(data_key.len(), 1);

        let bare = history_points(&json!([{"date": "2024-01", "actual": 5}]));
        assert_eq!(bare.len(), 1);

        assert!(history_points(&json!({"unrelated": true})).is_empty());
    }

    #[test]
    fn seasonal_detection() {
        let seasonal = ModelMetadata::from_json(&json!({
            "model_type": "SARIMA",
            "parameters": {"order": [1, 1, 1], "seasonal_order": [1, 1, 1, 12]},
        }));
        assert!(seasonal.is_seasonal());

        let plain = ModelMetadata::from_json(&json!({
            "model_type": "ARIMA",
            "parameters": {"order": [2, 1, 2]},
        }));
        assert!(!plain.is_seasonal());

        let null_block = ModelMetadata::from_json(&json!({
            "model_type": "ARIMA",
            "parameters": {"seasonal_order": null},
        }));
        assert!(!null_block.is_seasonal());
    }

    #[test]
    fn model_catalog_entries() {
        let models = model_catalog(&json!({
            "models": [
                {"offense": "homicide", "location": "national", "model_type": "Prophet", "mape": 12.0, "training_end": "2024-10"},
                {"offense": "burglary", "model_type": "ARIMA"},
            ]
        }));
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].offense, "homicide");
        assert_eq!(models[0].metadata.model_type, "Prophet");
        assert_eq!(models[1].location, "national");
    }
}
