#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Tool parameter types and tool-use schema definitions.
//!
//! Defines the input types for each UCR tool that a caller (agent host,
//! CLI) can invoke, along with JSON Schema descriptions for the LLM
//! tool-use protocol.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Comparison metric for the compare tool.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CompareMetric {
    /// Raw incident counts only.
    Absolute,
    /// Counts plus a percent-change column with significance warnings.
    PercentChange,
}

/// Parameters for the forecast tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastParams {
    /// Crime type to forecast (canonical name or known alias).
    pub offense: String,
    /// Forecast horizon in months, 1-12.
    #[serde(default = "default_months_ahead")]
    pub months_ahead: u32,
    /// Whether to include recent historical data for context.
    #[serde(default)]
    pub include_history: bool,
    /// Output format: `"summary"` for prose, `"detailed"` for full JSON.
    #[serde(default = "default_format")]
    pub format: String,
    /// Optional 2-letter state code; national scope when omitted.
    #[serde(default)]
    pub state: Option<String>,
}

/// Parameters for the history tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryParams {
    /// Crime type to fetch history for (canonical name or known alias).
    pub offense: String,
    /// Start year, 2015 or later.
    #[serde(default = "default_from_year")]
    pub from_year: i32,
    /// End year; defaults to the current year when omitted.
    #[serde(default)]
    pub to_year: Option<i32>,
    /// Optional 2-letter state code; national scope when omitted.
    #[serde(default)]
    pub state: Option<String>,
    /// Output format: `"summary"` for prose, `"detailed"` for full JSON.
    #[serde(default = "default_format")]
    pub format: String,
}

/// Parameters for the compare tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareParams {
    /// 2-5 offense types to compare.
    pub offenses: Vec<String>,
    /// Forecast horizon in months, 1-12.
    #[serde(default = "default_months_ahead")]
    pub months_ahead: u32,
    /// Comparison metric.
    #[serde(default = "default_metric")]
    pub metric: CompareMetric,
    /// Optional 2-letter state code; national scope when omitted.
    #[serde(default)]
    pub state: Option<String>,
}

/// Parameters for the info tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfoParams {
    /// Specific offense to get details for; lists all models when omitted.
    #[serde(default)]
    pub offense: Option<String>,
    /// Optional 2-letter state code filter; national models when omitted.
    #[serde(default)]
    pub state: Option<String>,
}

const fn default_months_ahead() -> u32 {
    6
}

const fn default_from_year() -> i32 {
    2020
}

fn default_format() -> String {
    "summary".to_string()
}

const fn default_metric() -> CompareMetric {
    CompareMetric::PercentChange
}

/// Enumeration of all tool names a caller can invoke.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ToolName {
    /// Generate crime predictions with confidence intervals.
    UcrForecast,
    /// Fetch multi-year historical data from the FBI Crime Data Explorer.
    UcrHistory,
    /// Compare forecasts across 2-5 offense types.
    UcrCompare,
    /// Describe the available forecasting models.
    UcrInfo,
}

/// Returns the JSON Schema definitions for all available tools.
///
/// These are used in the LLM tool-use protocol to describe what tools the
/// host can invoke.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn tool_definitions() -> Vec<serde_json::Value> {
    vec![
        serde_json::json!({
            "name": "ucr_forecast",
            "description": "Generate crime predictions using FBI UCR data and time-series models. Returns forecasts with confidence intervals for violent-crime, property-crime, homicide, burglary, or motor-vehicle-theft. Supports national and state-level (CA, TX, FL, NY, IL) forecasts.",
            "parameters": {
                "type": "object",
                "properties": {
                    "offense": { "type": "string", "description": "Crime type to forecast. One of: violent-crime, property-crime, homicide, burglary, motor-vehicle-theft" },
                    "months_ahead": { "type": "integer", "description": "How many months to forecast (1-12, default: 6)" },
                    "include_history": { "type": "boolean", "description": "Include recent historical data for context (default: false)" },
                    "format": { "type": "string", "description": "Output format: 'summary' for prose, 'detailed' for full JSON" },
                    "state": { "type": "string", "description": "State code for state-level forecast (CA, TX, FL, NY, IL). If omitted, returns national-level forecast." }
                },
                "required": ["offense"]
            }
        }),
        serde_json::json!({
            "name": "ucr_history",
            "description": "Fetch historical crime data from the FBI Crime Data Explorer API for multi-year trend analysis. Use this for actual historical statistics, NOT predictions. Supports 2015-present, national and state-level (CA, TX, FL, NY, IL).",
            "parameters": {
                "type": "object",
                "properties": {
                    "offense": { "type": "string", "description": "Crime type to fetch history for. One of: violent-crime, property-crime, homicide, burglary, motor-vehicle-theft" },
                    "from_year": { "type": "integer", "description": "Start year for historical data (2015 or later, default: 2020)" },
                    "to_year": { "type": "integer", "description": "End year for historical data (default: current year)" },
                    "state": { "type": "string", "description": "State code for state-level data (CA, TX, FL, NY, IL). If omitted, returns national-level data." },
                    "format": { "type": "string", "description": "Output format: 'summary' for prose, 'detailed' for full JSON" }
                },
                "required": ["offense"]
            }
        }),
        serde_json::json!({
            "name": "ucr_compare",
            "description": "Compare crime trend forecasts across multiple offense types in a single call. Returns a side-by-side table with current values, forecasts, and percent changes, highlighting significant changes with warnings.",
            "parameters": {
                "type": "object",
                "properties": {
                    "offenses": { "type": "array", "items": { "type": "string" }, "description": "List of 2-5 offense types to compare. Valid values: violent-crime, property-crime, homicide, burglary, motor-vehicle-theft" },
                    "months_ahead": { "type": "integer", "description": "Forecast horizon in months (1-12, default: 6)" },
                    "metric": { "type": "string", "enum": ["absolute", "percent_change"], "description": "'absolute' shows raw counts, 'percent_change' shows trends (default: percent_change)" },
                    "state": { "type": "string", "description": "State code for state-level comparison (CA, TX, FL, NY, IL). If omitted, compares national-level data." }
                },
                "required": ["offenses"]
            }
        }),
        serde_json::json!({
            "name": "ucr_info",
            "description": "Get information about available FBI UCR crime forecasting models. Lists all models or returns details for a specific offense including accuracy and methodology.",
            "parameters": {
                "type": "object",
                "properties": {
                    "offense": { "type": "string", "description": "Specific offense to get details for. If omitted, lists all available models." },
                    "state": { "type": "string", "description": "State code to filter models (CA, TX, FL, NY, IL). If omitted, shows national-level models." }
                },
                "required": []
            }
        }),
    ]
}
