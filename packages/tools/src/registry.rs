//! Tool registry: name-based dispatch from raw JSON parameters.

use std::str::FromStr as _;

use ucr_forecast_tools_models::{
    CompareParams, ForecastParams, HistoryParams, InfoParams, ToolName,
};
use ucr_forecast_upstream::{CrimeDataClient, PredictionClient};

use crate::ToolError;
use crate::compare::ucr_compare;
use crate::forecast::ucr_forecast;
use crate::history::ucr_history;
use crate::info::ucr_info;

/// The upstream clients shared by all tool invocations.
///
/// Construct once and reuse; both clients hold a connection-pooling
/// `reqwest::Client` internally.
#[derive(Debug, Clone)]
pub struct Toolbox {
    /// Client for the UCR prediction service.
    pub prediction: PredictionClient,
    /// Client for the FBI Crime Data Explorer API.
    pub crime_data: CrimeDataClient,
}

impl Toolbox {
    /// Builds a toolbox from `UCR_API_BASE_URL`, `FBI_API_BASE_URL`, and
    /// `FBI_API_KEY`, falling back to the public endpoints.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            prediction: PredictionClient::from_env(),
            crime_data: CrimeDataClient::from_env(),
        }
    }
}

/// Executes the named tool with the given JSON parameters.
///
/// # Errors
///
/// Returns [`ToolError::Validation`] for an unknown tool name,
/// [`ToolError::Params`] when the parameters do not decode, or the tool's
/// own error when execution fails.
pub async fn execute_tool(
    toolbox: &Toolbox,
    name: &str,
    params: &serde_json::Value,
) -> Result<String, ToolError> {
    let tool = ToolName::from_str(name).map_err(|_| ToolError::Validation {
        message: format!("Unknown tool: {name}"),
    })?;

    log::debug!("Executing tool {tool} with params {params}");

    match tool {
        ToolName::UcrForecast => {
            let params: ForecastParams = serde_json::from_value(params.clone())?;
            ucr_forecast(&toolbox.prediction, &params).await
        }
        ToolName::UcrHistory => {
            let params: HistoryParams = serde_json::from_value(params.clone())?;
            ucr_history(&toolbox.crime_data, &params).await
        }
        ToolName::UcrCompare => {
            let params: CompareParams = serde_json::from_value(params.clone())?;
            ucr_compare(&toolbox.prediction, &params).await
        }
        ToolName::UcrInfo => {
            let params: InfoParams = serde_json::from_value(params.clone())?;
            ucr_info(&toolbox.prediction, &params).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn offline_toolbox() -> Toolbox {
        Toolbox {
            prediction: PredictionClient::new("http://127.0.0.1:0"),
            crime_data: CrimeDataClient::new("http://127.0.0.1:0", None),
        }
    }

    #[tokio::test]
    async fn unknown_tool_rejected() {
        let err = execute_tool(&offline_toolbox(), "ucr_predict", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Validation { .. }));
        assert_eq!(err.to_string(), "Unknown tool: ucr_predict");
    }

    #[tokio::test]
    async fn malformed_params_rejected() {
        // months_ahead must be an integer
        let err = execute_tool(
            &offline_toolbox(),
            "ucr_forecast",
            &json!({"offense": "homicide", "months_ahead": "six"}),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ToolError::Params(_)));
        assert!(err.to_string().starts_with("Invalid tool parameters:"));
    }

    #[tokio::test]
    async fn dispatch_reaches_tool_validation() {
        // Validation errors fire before any network traffic, so an offline
        // toolbox is enough to prove dispatch reached the right tool.
        let err = execute_tool(
            &offline_toolbox(),
            "ucr_forecast",
            &json!({"offense": "arson"}),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Unknown offense type: 'arson'"));

        let err = execute_tool(
            &offline_toolbox(),
            "ucr_history",
            &json!({"offense": "burglary", "from_year": 1999}),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("2015 or later"));

        let err = execute_tool(
            &offline_toolbox(),
            "ucr_compare",
            &json!({"offenses": ["homicide"]}),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("At least 2 offenses"));

        let err = execute_tool(
            &offline_toolbox(),
            "ucr_info",
            &json!({"state": "Ontario"}),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ToolError::Validation { .. }));
    }
}
