//! Info tool: model catalog listing and per-offense model details.

use std::str::FromStr as _;

use ucr_forecast_taxonomy::{Offense, StateCode, normalize_state};
use ucr_forecast_tools_models::InfoParams;
use ucr_forecast_upstream::{FetchError, PredictionClient};
use ucr_forecast_upstream_models::ModelInfo;

use crate::ToolError;
use crate::format::{format_month_long, title_case};

/// Describes the available forecasting models, or one offense's model in
/// detail.
///
/// The offense parameter is matched case-insensitively against the
/// catalog rather than validated against the closed set, so the listing
/// stays accurate if the upstream adds models.
///
/// # Errors
///
/// Returns [`ToolError`] if the state filter is invalid, the catalog
/// fetch fails, or the requested offense has no model.
pub async fn ucr_info(client: &PredictionClient, params: &InfoParams) -> Result<String, ToolError> {
    let state = normalize_state(params.state.as_deref())?;

    let models = client.fetch_models(state).await.map_err(catalog_error)?;

    if models.is_empty() {
        return Err(ToolError::Unexpected {
            message: state.map_or_else(
                || "No models available from the API".to_string(),
                |state| format!("No models available for state: {state}"),
            ),
        });
    }

    let Some(offense) = &params.offense else {
        return Ok(format_model_list(&models, state));
    };

    let wanted = offense.trim().to_lowercase();
    models
        .iter()
        .find(|model| model.offense.to_lowercase() == wanted)
        .map(format_model_details)
        .ok_or_else(|| {
            let mut available: Vec<&str> =
                models.iter().map(|model| model.offense.as_str()).collect();
            available.sort_unstable();
            available.dedup();
            ToolError::Validation {
                message: format!(
                    "Offense '{offense}' not found. Available offenses: {}",
                    available.join(", ")
                ),
            }
        })
}

/// Maps a catalog fetch failure to a user-facing error.
fn catalog_error(err: FetchError) -> ToolError {
    match err {
        FetchError::Timeout => ToolError::Timeout {
            message: "Request timed out while fetching model information".to_string(),
        },
        FetchError::Status { status, .. } => ToolError::Http {
            status,
            message: format!("Failed to fetch model information: HTTP {status}"),
        },
        FetchError::Connection { message } => ToolError::Connection {
            message: format!("Network error while fetching model information: {message}"),
        },
        FetchError::Decode(err) => ToolError::Unexpected {
            message: err.to_string(),
        },
    }
}

/// One-line description of each offense, for the list view.
fn offense_description(offense: Offense) -> &'static str {
    match offense {
        Offense::ViolentCrime => "All violent crimes combined (murder, rape, robbery, assault)",
        Offense::PropertyCrime => "All property crimes combined (burglary, theft, vehicle theft)",
        Offense::Homicide => "Murder and non-negligent manslaughter",
        Offense::Burglary => "Unlawful entry to commit felony",
        Offense::MotorVehicleTheft => "Theft or attempted theft of motor vehicles",
    }
}

/// Longer description used in the detail view.
fn offense_full_description(offense: Offense) -> &'static str {
    match offense {
        Offense::ViolentCrime => {
            "All violent crimes combined including murder, rape, robbery, and aggravated assault"
        }
        Offense::PropertyCrime => {
            "All property crimes combined including burglary, larceny-theft, and motor vehicle theft"
        }
        Offense::Homicide => "Murder and non-negligent manslaughter",
        Offense::Burglary => "Unlawful entry of a structure to commit a felony or theft",
        Offense::MotorVehicleTheft => "Theft or attempted theft of motor vehicles",
    }
}

/// Why the chosen algorithm suits this offense, for the detail view.
fn why_model(offense: Offense) -> &'static str {
    match offense {
        Offense::ViolentCrime => {
            "Violent crime aggregates multiple offense types, making it suitable for \
             standard ARIMA modeling."
        }
        Offense::PropertyCrime => {
            "Property crime data is well-suited for ARIMA models due to consistent \
             reporting patterns."
        }
        Offense::Homicide => {
            "Homicide data benefits from Prophet's ability to handle irregular patterns \
             and holidays."
        }
        Offense::Burglary => "Burglary shows stable trends suitable for ARIMA time-series modeling.",
        Offense::MotorVehicleTheft => {
            "This offense shows strong seasonal patterns (higher in summer, lower in \
             winter), which SARIMA captures better than standard ARIMA."
        }
    }
}

/// Model type with a `(seasonal)` suffix when the model carries a seasonal
/// parameter block.
fn model_type_label(model: &ModelInfo) -> String {
    if model.metadata.is_seasonal() {
        format!("{} (seasonal)", model.metadata.model_type)
    } else {
        model.metadata.model_type.clone()
    }
}

/// Renders the list view, filtered to the requested location.
fn format_model_list(models: &[ModelInfo], state: Option<StateCode>) -> String {
    let mut lines = state.map_or_else(
        || vec!["FBI UCR Crime Forecasting Models".to_string()],
        |state| vec![format!("FBI UCR Crime Forecasting Models - {}", state.display_name())],
    );
    lines.push(String::new());
    lines.push("Available Models:".to_string());
    lines.push(String::new());

    let wanted_location =
        state.map_or_else(|| "national".to_string(), |state| state.to_string());

    for (idx, model) in models
        .iter()
        .filter(|model| model.location == wanted_location)
        .enumerate()
    {
        let description = Offense::from_str(&model.offense).map_or(
            "No description available",
            offense_description,
        );

        lines.push(format!("{}. {}", idx + 1, model.offense));
        lines.push(format!("   Description: {description}"));
        lines.push(format!(
            "   Model: {} | Accuracy: {:.1}% (MAPE: {:.1}%)",
            model_type_label(model),
            model.metadata.accuracy(),
            model.metadata.mape,
        ));
        lines.push(format!(
            "   Training data through: {}",
            format_month_long(&model.metadata.training_end)
        ));
        lines.push(String::new());
    }

    lines.push("Data source: FBI Uniform Crime Reporting (UCR) Program".to_string());
    if let Some(state) = state {
        lines.push(format!("Geographic scope: {}", state.display_name()));
    } else {
        lines.push("Geographic scope: National level".to_string());
        lines.push(format!("State-level support: {}", StateCode::valid_list()));
    }
    lines.push("Forecast horizon: Up to 12 months".to_string());

    lines.join("\n")
}

/// Renders the detail view for a single catalog entry.
fn format_model_details(model: &ModelInfo) -> String {
    let offense = Offense::from_str(&model.offense).ok();
    let description = offense.map_or_else(
        || "No description available".to_string(),
        |offense| offense_full_description(offense).to_string(),
    );

    let mut lines = vec![
        format!("{} Forecasting Model", title_case(&model.offense)),
        String::new(),
        format!("Description: {description}"),
        String::new(),
        "Model Details:".to_string(),
        format!("- Algorithm: {}", model.metadata.model_type),
    ];

    if let Some(order) = model.metadata.parameters.get("order") {
        let mut parameters = format!("- Parameters: order={order}");
        if let Some(seasonal) = model.metadata.parameters.get("seasonal_order")
            && !seasonal.is_null()
        {
            parameters.push_str(&format!(", seasonal_order={seasonal}"));
        }
        lines.push(parameters);
    }

    lines.push(format!(
        "- Accuracy: {:.1}% (MAPE: {:.1}%)",
        model.metadata.accuracy(),
        model.metadata.mape,
    ));
    lines.push(format!(
        "- Training data: Through {}",
        format_month_long(&model.metadata.training_end)
    ));

    if let Some(offense) = offense {
        lines.push(String::new());
        lines.push(format!(
            "Why {}: {}",
            model.metadata.model_type,
            why_model(offense)
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Use ucr_forecast(offense=\"{}\") to generate predictions.",
        model.offense
    ));

    lines.join("\n")
}
