//! History tool: multi-year historical series from the FBI Crime Data
//! Explorer, aggregated to annual totals with a trend classification.

use chrono::Datelike as _;
use ucr_forecast_taxonomy::{Offense, StateCode, normalize_offense, normalize_state};
use ucr_forecast_tools_models::HistoryParams;
use ucr_forecast_upstream::{CrimeDataClient, FetchError};
use ucr_forecast_upstream_models::HistoryPoint;

use crate::format::{OutputFormat, format_count, format_signed_percent, parse_output_format, round2};
use crate::metrics::{determine_trend, yearly_totals};
use crate::ToolError;

/// Earliest year the FBI Crime Data Explorer provides data for.
const EARLIEST_YEAR: i32 = 2015;

/// Fetches historical crime data for multi-year trend analysis.
///
/// # Errors
///
/// Returns [`ToolError`] if validation fails or the FBI API is
/// unavailable.
pub async fn ucr_history(
    client: &CrimeDataClient,
    params: &HistoryParams,
) -> Result<String, ToolError> {
    let offense = normalize_offense(&params.offense)?;
    let state = normalize_state(params.state.as_deref())?;
    let to_year = params
        .to_year
        .unwrap_or_else(|| chrono::Utc::now().year());

    if params.from_year < EARLIEST_YEAR {
        return Err(ToolError::Validation {
            message: format!(
                "from_year must be {EARLIEST_YEAR} or later (got {}). \
                 FBI Crime Data Explorer API provides data from {EARLIEST_YEAR} onward.",
                params.from_year
            ),
        });
    }
    if params.from_year > to_year {
        return Err(ToolError::Validation {
            message: format!(
                "from_year ({}) must be less than or equal to to_year ({to_year}).",
                params.from_year
            ),
        });
    }

    let format = parse_output_format(&params.format)?;

    let data = client
        .fetch_history(offense, state, params.from_year, to_year)
        .await
        .map_err(|err| history_error(&err, offense, params.from_year, to_year))?;

    Ok(match format {
        OutputFormat::Summary => {
            format_summary(offense, state, &data, params.from_year, to_year)
        }
        OutputFormat::Detailed => {
            format_detailed(offense, state, &data, params.from_year, to_year)
        }
    })
}

/// Maps an FBI API failure to a user-facing error.
fn history_error(err: &FetchError, offense: Offense, from_year: i32, to_year: i32) -> ToolError {
    match err {
        FetchError::Timeout => ToolError::Timeout {
            message: "The FBI Crime Data Explorer API is not responding. Please try again later."
                .to_string(),
        },
        FetchError::Status { status: 404, .. } => ToolError::Http {
            status: 404,
            message: format!(
                "No data found for '{offense}' in the specified date range \
                 ({from_year}-{to_year})."
            ),
        },
        FetchError::Status { status, .. } if *status >= 500 => ToolError::Http {
            status: *status,
            message: "The FBI Crime Data Explorer API is experiencing issues. \
                      Please try again later."
                .to_string(),
        },
        FetchError::Status { status, body } => ToolError::Http {
            status: *status,
            message: format!("FBI API request failed: {status} - {body}"),
        },
        FetchError::Connection { message } => ToolError::Connection {
            message: format!(
                "Could not connect to the FBI Crime Data Explorer API: {message}. \
                 Please check your network connection."
            ),
        },
        FetchError::Decode(err) => ToolError::Unexpected {
            message: err.to_string(),
        },
    }
}

/// Renders the historical series as a human-readable summary.
fn format_summary(
    offense: Offense,
    state: Option<StateCode>,
    data: &[HistoryPoint],
    from_year: i32,
    to_year: i32,
) -> String {
    let mut lines = Vec::new();

    let location = state.map_or("United States", StateCode::display_name);
    lines.push(format!(
        "{} Historical Data ({location})",
        offense.display_name()
    ));
    lines.push(format!("Period: {from_year} - {to_year}"));
    lines.push(String::new());

    if data.is_empty() {
        lines.push("No data available for the requested period.".to_string());
        return lines.join("\n");
    }

    lines.push("Annual Totals:".to_string());
    #[allow(clippy::cast_precision_loss)]
    for (year, total) in yearly_totals(data) {
        lines.push(format!("- {year}: {} incidents", format_count(total as f64)));
    }
    lines.push(String::new());

    #[allow(clippy::cast_precision_loss)]
    let actuals: Vec<f64> = data.iter().map(|p| p.actual as f64).collect();
    let trend = determine_trend(&actuals);
    lines.push(format!(
        "Overall Trend: {} ({} from start to end)",
        trend.direction,
        format_signed_percent(trend.percent_change),
    ));

    lines.push(String::new());
    lines.push(
        "Note: Data from FBI Crime Data Explorer. Approximately 2-month reporting lag."
            .to_string(),
    );
    lines.push(format!("Total months of data: {}", data.len()));

    lines.join("\n")
}

/// Renders the historical series as structured JSON.
fn format_detailed(
    offense: Offense,
    state: Option<StateCode>,
    data: &[HistoryPoint],
    from_year: i32,
    to_year: i32,
) -> String {
    #[allow(clippy::cast_precision_loss)]
    let actuals: Vec<f64> = data.iter().map(|p| p.actual as f64).collect();
    let trend = determine_trend(&actuals);

    let result = serde_json::json!({
        "offense": offense.to_string(),
        "location": state.map_or_else(|| "national".to_string(), |s| s.to_string()),
        "from_year": from_year,
        "to_year": to_year,
        "total_months": data.len(),
        "yearly_totals": yearly_totals(data),
        "monthly_data": data,
        "trend": {
            "direction": trend.direction,
            "percent_change": round2(trend.percent_change),
        },
        "data_source": "FBI Crime Data Explorer API",
        "notes": "Data has approximately 2-month reporting lag",
    });

    serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string())
}
