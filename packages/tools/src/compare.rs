//! Compare tool: side-by-side forecast table for 2-5 offenses.
//!
//! Fetches prediction+history pairs concurrently with per-offense error
//! isolation, then assembles a fixed-width table with optional percent
//! change and significance warnings.

use std::fmt::Write as _;
use std::str::FromStr as _;

use futures::future::join_all;
use ucr_forecast_taxonomy::{Offense, StateCode, normalize_offense, normalize_state};
use ucr_forecast_tools_models::{CompareMetric, CompareParams};
use ucr_forecast_upstream::{OffenseFetch, PredictionClient, fetch_offense_data};

use crate::format::{format_count, format_signed_percent};
use crate::metrics::percent_change;
use crate::{ToolError, validate_months_ahead};

/// Minimum number of offenses accepted for a comparison.
const MIN_OFFENSES: usize = 2;
/// Maximum number of offenses compared in one call (fan-out bound).
const MAX_OFFENSES: usize = 5;
/// Absolute percent change beyond which a row gets a warning.
const SIGNIFICANT_CHANGE_PERCENT: f64 = 10.0;
/// Minimum width of the offense-name column.
const MIN_NAME_WIDTH: usize = 22;
/// Marker appended to significant change cells and warning lines.
const WARNING_MARKER: &str = "\u{26a0}\u{fe0f}";

/// Compares crime trend forecasts across multiple offense types.
///
/// Offense count and every offense name are validated before any network
/// call; all invalid names are aggregated into one error rather than
/// short-circuiting on the first.
///
/// # Errors
///
/// Returns [`ToolError`] if validation fails or every offense's fetch
/// failed.
pub async fn ucr_compare(
    client: &PredictionClient,
    params: &CompareParams,
) -> Result<String, ToolError> {
    if params.offenses.len() < MIN_OFFENSES {
        return Err(ToolError::Validation {
            message: format!(
                "At least {MIN_OFFENSES} offenses are required for comparison. \
                 You provided {}. Valid offenses: {}",
                params.offenses.len(),
                Offense::valid_list(),
            ),
        });
    }
    if params.offenses.len() > MAX_OFFENSES {
        return Err(ToolError::Validation {
            message: format!(
                "Maximum {MAX_OFFENSES} offenses can be compared at once. \
                 You provided {}. Please select up to {MAX_OFFENSES} offenses from: {}",
                params.offenses.len(),
                Offense::valid_list(),
            ),
        });
    }

    let state = normalize_state(params.state.as_deref())?;
    validate_months_ahead(params.months_ahead)?;
    let offenses = normalize_offense_list(&params.offenses)?;

    let results = join_all(
        offenses
            .iter()
            .map(|&offense| fetch_offense_data(client, offense, params.months_ahead, state)),
    )
    .await;

    if results.iter().all(|result| result.error.is_some()) {
        return Err(ToolError::AllSourcesFailed {
            message: "The FBI UCR prediction service is temporarily unavailable.\n\n\
                      This may be due to:\n\
                      - Scheduled maintenance\n\
                      - High demand\n\
                      - Network issues\n\n\
                      Try again in a few minutes. If the problem persists, the service \
                      may be experiencing an outage."
                .to_string(),
        });
    }

    Ok(format_comparison(
        &results,
        params.months_ahead,
        params.metric,
        state,
    ))
}

/// Normalizes every offense, aggregating all failures into one error with
/// a did-you-mean hint for underscore-for-hyphen mistakes.
fn normalize_offense_list(inputs: &[String]) -> Result<Vec<Offense>, ToolError> {
    let mut offenses = Vec::with_capacity(inputs.len());
    let mut suggestions = Vec::new();

    for input in inputs {
        match normalize_offense(input) {
            Ok(offense) => offenses.push(offense),
            Err(_) => {
                let cleaned = input.trim().to_lowercase();
                let corrected = cleaned.replace('_', "-");
                if cleaned.contains('_') && Offense::from_str(&corrected).is_ok() {
                    suggestions.push(format!("\"{input}\" -> Did you mean \"{corrected}\"?"));
                } else {
                    suggestions.push(format!("\"{input}\" is not recognized"));
                }
            }
        }
    }

    if suggestions.is_empty() {
        return Ok(offenses);
    }

    let mut message = String::from("Invalid offense(s) in list:\n");
    for suggestion in &suggestions {
        let _ = writeln!(message, "  - {suggestion}");
    }
    let _ = write!(
        message,
        "\nValid offenses: {}\nNote: Use hyphens, not underscores.",
        Offense::valid_list()
    );

    Err(ToolError::Validation { message })
}

/// Assembles the comparison table, warnings, error lines, and model footer.
fn format_comparison(
    results: &[OffenseFetch],
    months_ahead: u32,
    metric: CompareMetric,
    state: Option<StateCode>,
) -> String {
    let location = state.map_or("National", StateCode::display_name);
    let mut lines = vec![
        format!("Crime Trend Comparison - {location} ({months_ahead}-month forecast):"),
        String::new(),
    ];

    let name_width = results
        .iter()
        .map(|result| result.offense.display_name().len())
        .max()
        .unwrap_or(0)
        .max(MIN_NAME_WIDTH);

    let forecast_header = format!("{months_ahead}-Month Forecast");
    let mut header = format!("{:>name_width$}  {:>12}  {forecast_header:>18}", "", "Current");
    if metric == CompareMetric::PercentChange {
        let _ = write!(header, "  {:>10}", "Change");
    }
    lines.push(header);

    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    let mut models: Vec<(Offense, String)> = Vec::new();
    let mut training_ends: Vec<String> = Vec::new();

    for result in results {
        let display = result.offense.display_name();

        if let Some(error) = &result.error {
            errors.push(format!("{display}: {error}"));
            continue;
        }

        #[allow(clippy::cast_precision_loss)]
        let current = result.history.last().map_or(0.0, |p| p.actual as f64);
        let forecast = result
            .prediction
            .as_ref()
            .map_or(0.0, |prediction| prediction.final_predicted());

        if let Some(prediction) = &result.prediction {
            let metadata = &prediction.metadata;
            models.push((result.offense, metadata.model_type.clone()));
            if !metadata.training_end.is_empty()
                && !training_ends.contains(&metadata.training_end)
            {
                training_ends.push(metadata.training_end.clone());
            }
        }

        let mut row = format!(
            "{display:>name_width$}  {:>12}  {:>18}",
            format_count(current),
            format_count(forecast),
        );

        if metric == CompareMetric::PercentChange {
            let change = percent_change(current, forecast);
            let mut change_cell = format_signed_percent(change);

            if change.abs() > SIGNIFICANT_CHANGE_PERCENT {
                change_cell.push(' ');
                change_cell.push_str(WARNING_MARKER);
                warnings.push(format!(
                    "{display} shows significant projected {}.",
                    if change > 0.0 { "increase" } else { "decrease" },
                ));
            }

            let _ = write!(row, "  {change_cell:>10}");
        }

        lines.push(row);
    }

    lines.push(String::new());

    for warning in &warnings {
        lines.push(format!("{WARNING_MARKER} {warning}"));
    }
    if !warnings.is_empty() {
        lines.push(String::new());
    }

    for error in &errors {
        lines.push(format!("Error: {error}"));
    }
    if !errors.is_empty() {
        lines.push(String::new());
    }

    if !models.is_empty() {
        // Group offenses under each model type, preserving first-seen order
        let mut groups: Vec<(String, Vec<&'static str>)> = Vec::new();
        for (offense, model) in &models {
            if let Some(group) = groups.iter_mut().find(|(name, _)| name == model) {
                group.1.push(offense.short_name());
            } else {
                groups.push((model.clone(), vec![offense.short_name()]));
            }
        }

        let model_parts: Vec<String> = groups
            .iter()
            .map(|(model, offenses)| format!("{model} ({})", offenses.join(", ")))
            .collect();

        let training_end = if training_ends.len() == 1 {
            training_ends[0].clone()
        } else {
            "varies".to_string()
        };

        lines.push(format!(
            "Models: {} | Data through: {training_end}",
            model_parts.join(", ")
        ));
    }

    lines.join("\n")
}
