//! Forecast tool: single-offense prediction with optional history context.

use ucr_forecast_taxonomy::{Offense, StateCode, normalize_offense, normalize_state};
use ucr_forecast_tools_models::ForecastParams;
use ucr_forecast_upstream::{FetchError, PredictionClient};
use ucr_forecast_upstream_models::{HistoryPoint, PredictionResponse};

use crate::format::{
    OutputFormat, format_count, format_month_short, format_signed_percent, parse_output_format,
    round2,
};
use crate::metrics::determine_trend;
use crate::{ToolError, validate_months_ahead};

/// Months of history fetched for context when `include_history` is set.
const HISTORY_CONTEXT_MONTHS: u32 = 6;
/// At most this many history points appear in the Recent History block.
const HISTORY_DISPLAY_POINTS: usize = 3;

/// Generates a crime forecast for one offense.
///
/// The optional history fetch is deliberately non-fatal: if it fails, the
/// output simply lacks the Recent History section.
///
/// # Errors
///
/// Returns [`ToolError`] if validation fails or the prediction service is
/// unavailable.
pub async fn ucr_forecast(
    client: &PredictionClient,
    params: &ForecastParams,
) -> Result<String, ToolError> {
    let offense = normalize_offense(&params.offense)?;
    let state = normalize_state(params.state.as_deref())?;
    validate_months_ahead(params.months_ahead)?;
    let format = parse_output_format(&params.format)?;

    let prediction = client
        .fetch_prediction(offense, params.months_ahead, state)
        .await
        .map_err(|err| prediction_error(&err, offense, state))?;

    let history = if params.include_history {
        match client
            .fetch_history(offense, HISTORY_CONTEXT_MONTHS, state)
            .await
        {
            Ok(points) => Some(points),
            Err(err) => {
                log::warn!("History unavailable for {offense}, continuing without: {err}");
                None
            }
        }
    } else {
        None
    };

    Ok(match format {
        OutputFormat::Summary => format_summary(
            offense,
            params.months_ahead,
            &prediction,
            history.as_deref(),
            state,
        ),
        OutputFormat::Detailed => format_detailed(
            offense,
            params.months_ahead,
            &prediction,
            history.as_deref(),
            state,
        ),
    })
}

/// Maps a prediction-service failure to a user-facing error.
fn prediction_error(err: &FetchError, offense: Offense, state: Option<StateCode>) -> ToolError {
    let location = state.map_or("national", StateCode::display_name);
    match err {
        FetchError::Timeout => ToolError::Timeout {
            message: "The FBI UCR prediction service is not responding. \
                      Please try again later or check service status."
                .to_string(),
        },
        FetchError::Status { status: 404, .. } => ToolError::Http {
            status: 404,
            message: format!(
                "No prediction model found for '{offense}' ({location}). \
                 The model may not be available yet."
            ),
        },
        FetchError::Status { status, .. } if *status >= 500 => ToolError::Http {
            status: *status,
            message: "The FBI UCR prediction service is experiencing issues. \
                      Please try again later."
                .to_string(),
        },
        FetchError::Status { status, body } => ToolError::Http {
            status: *status,
            message: format!("Failed to get predictions: {status} - {body}"),
        },
        FetchError::Connection { message } => ToolError::Connection {
            message: format!(
                "Could not connect to the FBI UCR prediction service: {message}. \
                 The service may be temporarily unavailable."
            ),
        },
        FetchError::Decode(err) => ToolError::Unexpected {
            message: err.to_string(),
        },
    }
}

/// Renders the forecast as a human-readable summary.
fn format_summary(
    offense: Offense,
    months_ahead: u32,
    prediction: &PredictionResponse,
    history: Option<&[HistoryPoint]>,
    state: Option<StateCode>,
) -> String {
    let mut lines = Vec::new();

    let location = state.map_or("National", StateCode::display_name);
    lines.push(format!(
        "{} Forecast ({location}, next {months_ahead} months):",
        offense.display_name()
    ));
    lines.push(String::new());

    if let Some(history) = history
        && !history.is_empty()
    {
        lines.push("Recent History:".to_string());
        let start = history.len().saturating_sub(HISTORY_DISPLAY_POINTS);
        #[allow(clippy::cast_precision_loss)]
        for point in &history[start..] {
            lines.push(format!(
                "- {}: {}",
                format_month_short(&point.date),
                format_count(point.actual as f64),
            ));
        }
        lines.push(String::new());
    }

    lines.push("Predicted Incidents:".to_string());
    for point in &prediction.predictions {
        lines.push(format!(
            "- {}: ~{} (range: {} - {})",
            format_month_short(&point.date),
            format_count(point.predicted),
            format_count(point.lower),
            format_count(point.upper),
        ));
    }
    lines.push(String::new());

    let predicted: Vec<f64> = prediction.predictions.iter().map(|p| p.predicted).collect();
    let trend = determine_trend(&predicted);
    lines.push(format!(
        "Trend: {} ({})",
        trend.direction,
        format_signed_percent(trend.percent_change),
    ));

    let metadata = &prediction.metadata;
    lines.push(format!(
        "Model: {} | Accuracy: {:.1}% | Data through: {}",
        metadata.model_type,
        metadata.accuracy(),
        format_month_short(&metadata.training_end),
    ));

    lines.join("\n")
}

/// Renders the forecast as structured JSON.
fn format_detailed(
    offense: Offense,
    months_ahead: u32,
    prediction: &PredictionResponse,
    history: Option<&[HistoryPoint]>,
    state: Option<StateCode>,
) -> String {
    let predicted: Vec<f64> = prediction.predictions.iter().map(|p| p.predicted).collect();
    let trend = determine_trend(&predicted);

    let mut result = serde_json::json!({
        "offense": offense.to_string(),
        "location": state.map_or_else(|| "national".to_string(), |s| s.to_string()),
        "months_forecasted": months_ahead,
        "predictions": prediction.predictions,
        "trend": {
            "direction": trend.direction,
            "percent_change": round2(trend.percent_change),
        },
        "model": prediction.metadata,
    });

    if let Some(history) = history {
        result["history"] = serde_json::json!(history);
    }
    if let Some(explanation) = &prediction.explanation {
        result["explanation"] = explanation.clone();
    }

    serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::{Read as _, Write as _};

    use super::*;
    use serde_json::json;
    use ucr_forecast_upstream_models::PredictionResponse;

    /// Minimal HTTP stub: answers POST (predict) with `predict_body` and
    /// every GET (history) with a 500.
    fn spawn_stub_server(predict_body: &'static str) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };

                let mut buf = [0_u8; 4096];
                let mut request = Vec::new();
                while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let response = if request.starts_with(b"POST") {
                    format!(
                        "HTTP/1.1 200 OK\r\n\
                         content-type: application/json\r\n\
                         content-length: {}\r\n\
                         connection: close\r\n\r\n{predict_body}",
                        predict_body.len(),
                    )
                } else {
                    "HTTP/1.1 500 Internal Server Error\r\n\
                     content-length: 0\r\n\
                     connection: close\r\n\r\n"
                        .to_string()
                };
                let _ = stream.write_all(response.as_bytes());
            }
        });

        format!("http://{addr}")
    }

    fn sample_prediction() -> PredictionResponse {
        PredictionResponse::from_json(&json!({
            "predictions": [
                {"date": "2025-01", "predicted": 1000, "lower": 900, "upper": 1100},
                {"date": "2025-02", "predicted": 1100, "lower": 1000, "upper": 1200},
            ],
            "metadata": {"model_type": "ARIMA", "mape": 8.0, "training_end": "2024-10"},
        }))
    }

    fn sample_history() -> Vec<HistoryPoint> {
        vec![
            HistoryPoint { date: "2024-07".to_string(), actual: 950, rate: None },
            HistoryPoint { date: "2024-08".to_string(), actual: 960, rate: None },
            HistoryPoint { date: "2024-09".to_string(), actual: 970, rate: None },
            HistoryPoint { date: "2024-10".to_string(), actual: 980, rate: None },
        ]
    }

    #[test]
    fn summary_contains_header_trend_and_model() {
        let output = format_summary(
            Offense::Homicide,
            6,
            &sample_prediction(),
            None,
            Some(StateCode::Tx),
        );
        assert!(output.starts_with("Homicide Forecast (Texas, next 6 months):"));
        assert!(output.contains("- Jan 2025: ~1,000 (range: 900 - 1,100)"));
        assert!(output.contains("Trend: Increasing (+10.0%)"));
        assert!(output.contains("Model: ARIMA | Accuracy: 92.0% | Data through: Oct 2024"));
        assert!(!output.contains("Recent History"));
    }

    #[test]
    fn summary_history_block_shows_last_three() {
        let output = format_summary(
            Offense::Homicide,
            6,
            &sample_prediction(),
            Some(&sample_history()),
            None,
        );
        assert!(output.contains("Homicide Forecast (National, next 6 months):"));
        assert!(output.contains("Recent History:"));
        // Only the last 3 of 4 points
        assert!(!output.contains("Jul 2024"));
        assert!(output.contains("- Aug 2024: 960"));
        assert!(output.contains("- Oct 2024: 980"));
    }

    #[test]
    fn detailed_is_valid_json_with_trend() {
        let output = format_detailed(
            Offense::Burglary,
            6,
            &sample_prediction(),
            Some(&sample_history()),
            None,
        );
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["offense"], "burglary");
        assert_eq!(value["location"], "national");
        assert_eq!(value["months_forecasted"], 6);
        assert_eq!(value["trend"]["direction"], "Increasing");
        assert_eq!(value["trend"]["percent_change"], 10.0);
        assert_eq!(value["predictions"].as_array().unwrap().len(), 2);
        assert_eq!(value["history"].as_array().unwrap().len(), 4);
        assert_eq!(value["model"]["model_type"], "ARIMA");
    }

    #[tokio::test]
    async fn history_failure_degrades_to_no_history_block() {
        let base_url = spawn_stub_server(
            r#"{"predictions":[{"date":"2025-01","predicted":1000,"lower":900,"upper":1100}],"metadata":{"model_type":"ARIMA","mape":8.0,"training_end":"2024-10"}}"#,
        );
        let client = PredictionClient::new(base_url);
        let params = ForecastParams {
            offense: "homicide".to_string(),
            months_ahead: 6,
            include_history: true,
            format: "summary".to_string(),
            state: None,
        };

        // The history GET fails with a 500, but the forecast still succeeds
        let output = ucr_forecast(&client, &params).await.unwrap();
        assert!(output.starts_with("Homicide Forecast (National, next 6 months):"));
        assert!(output.contains("Predicted Incidents:"));
        assert!(output.contains("- Jan 2025: ~1,000 (range: 900 - 1,100)"));
        assert!(!output.contains("Recent History:"));
    }

    #[tokio::test]
    async fn rejects_invalid_format_before_fetch() {
        let client = PredictionClient::new("http://127.0.0.1:0");
        let params = ForecastParams {
            offense: "homicide".to_string(),
            months_ahead: 6,
            include_history: false,
            format: "xml".to_string(),
            state: None,
        };
        let err = ucr_forecast(&client, &params).await.unwrap_err();
        assert!(matches!(err, ToolError::Validation { .. }));
        assert!(err.to_string().contains("Invalid format"));
    }

    #[tokio::test]
    async fn rejects_bad_horizon_before_fetch() {
        let client = PredictionClient::new("http://127.0.0.1:0");
        let params = ForecastParams {
            offense: "homicide".to_string(),
            months_ahead: 13,
            include_history: false,
            format: "summary".to_string(),
            state: None,
        };
        let err = ucr_forecast(&client, &params).await.unwrap_err();
        assert!(matches!(err, ToolError::Validation { .. }));
    }

    #[test]
    fn maps_404_to_model_not_found() {
        let err = prediction_error(
            &FetchError::Status { status: 404, body: String::new() },
            Offense::Homicide,
            Some(StateCode::Ca),
        );
        let message = err.to_string();
        assert!(message.contains("No prediction model found for 'homicide' (California)"));

        let err = prediction_error(
            &FetchError::Status { status: 503, body: String::new() },
            Offense::Homicide,
            None,
        );
        assert!(err.to_string().contains("experiencing issues"));
    }
}
